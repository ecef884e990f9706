//! Account pages: registration, sign-in, dashboard and profile editing.

use actix_web::{HttpResponse, http::header, web};
use chrono::Utc;

use scribe_core::DomainError;
use scribe_core::domain::{Profile, User};
use scribe_core::error::RepoError;
use scribe_core::forms::{
    AccountEditForm, FieldErrors, LoginForm, ProfileEditForm, RegistrationForm, UserEditForm,
};
use scribe_core::ports::PostScope;
use scribe_core::text::mask_email;
use scribe_shared::views::{
    AccountEditView, AuthResponse, DashboardView, RegisterDoneView, RegisterView,
};

use super::{PageQuery, paginate};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// GET /account/
pub async fn dashboard(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.into_inner().page;
    let posts = paginate(
        &state,
        PostScope::AuthoredBy(identity.user_id),
        page.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(DashboardView {
        section: "dashboard",
        total: posts.total,
        posts,
        page,
    }))
}

/// GET /account/register/
pub async fn register_form() -> HttpResponse {
    HttpResponse::Ok().json(RegisterView {
        user_form: RegistrationForm::default(),
        errors: FieldErrors::new(),
    })
}

/// POST /account/register/
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let invalid = |user_form: RegistrationForm, errors: FieldErrors| {
        HttpResponse::UnprocessableEntity().json(RegisterView { user_form, errors })
    };

    let account = match form.validate() {
        Ok(account) => account,
        Err(errors) => return Ok(invalid(form, errors)),
    };

    if state.users.find_by_username(&account.username).await?.is_some() {
        return Ok(invalid(form, FieldErrors::single("username", USERNAME_TAKEN)));
    }

    let password_hash = state.passwords.hash(&account.password)?;
    let user = User::new(account.username, account.email, password_hash)
        .with_first_name(account.first_name);

    // A concurrent registration can still win the unique index.
    let user = match state.users.save(user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            return Ok(invalid(form, FieldErrors::single("username", USERNAME_TAKEN)));
        }
        Err(e) => return Err(e.into()),
    };

    // An account without a profile is removed again so the username stays free.
    if let Err(e) = state.profiles.save(Profile::empty(user.id)).await {
        if let Err(cleanup) = state.users.delete(user.id).await {
            tracing::error!(
                user_id = %user.id,
                error = %cleanup,
                "Failed to remove user without profile"
            );
        }
        return Err(e.into());
    }

    tracing::info!(
        user_id = %user.id,
        email = %mask_email(&user.email),
        "User registered"
    );

    Ok(HttpResponse::Created().json(RegisterDoneView {
        new_user: user.into(),
    }))
}

/// POST /account/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let (username, password) = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(HttpResponse::UnprocessableEntity().json(errors)),
    };

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds() as u64,
    }))
}

/// GET /account/edit/
pub async fn edit_form(
    identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let (user, profile) = load_account(&state, &identity).await?;

    Ok(HttpResponse::Ok().json(AccountEditView {
        user_form: UserEditForm {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        },
        profile_form: ProfileEditForm {
            bio: profile.bio,
            photo: profile.photo.unwrap_or_default(),
        },
        user_errors: FieldErrors::new(),
        profile_errors: FieldErrors::new(),
    }))
}

/// POST /account/edit/
///
/// User and profile fields are saved together or not at all.
pub async fn edit(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<AccountEditForm>,
) -> AppResult<HttpResponse> {
    let (user_form, profile_form) = form.into_inner().split();

    let (user_changes, profile_changes) = match (user_form.validate(), profile_form.validate()) {
        (Ok(user_changes), Ok(profile_changes)) => (user_changes, profile_changes),
        (user_result, profile_result) => {
            return Ok(HttpResponse::UnprocessableEntity().json(AccountEditView {
                user_form,
                profile_form,
                user_errors: user_result.err().unwrap_or_default(),
                profile_errors: profile_result.err().unwrap_or_default(),
            }));
        }
    };

    let (mut user, mut profile) = load_account(&state, &identity).await?;
    let previous = user.clone();
    let now = Utc::now();

    user.first_name = user_changes.first_name;
    user.last_name = user_changes.last_name;
    user.email = user_changes.email;
    user.updated_at = now;
    state.users.save(user).await?;

    profile.bio = profile_changes.bio;
    profile.photo = profile_changes.photo;
    profile.updated_at = now;

    // The user row is written first and put back when the profile fails.
    if let Err(e) = state.profiles.save(profile).await {
        if let Err(restore) = state.users.save(previous).await {
            tracing::error!(
                user_id = %identity.user_id,
                error = %restore,
                "Failed to restore user"
            );
        }
        return Err(e.into());
    }

    tracing::info!(user_id = %identity.user_id, "Profile updated successfully");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

/// The signed-in user and their profile. A missing profile reads as empty,
/// so an account whose profile row was never written still loads.
async fn load_account(state: &AppState, identity: &Identity) -> AppResult<(User, Profile)> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", &identity.username))?;

    let profile = state
        .profiles
        .find_by_user_id(user.id)
        .await?
        .unwrap_or_else(|| Profile::empty(user.id));

    Ok((user, profile))
}
