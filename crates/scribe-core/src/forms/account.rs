//! Account forms: registration, sign-in and profile editing.

use serde::{Deserialize, Serialize};

use super::{FieldErrors, email, max_length, required};

const USERNAME_MAX: usize = 150;
const NAME_MAX: usize = 150;
const PHOTO_MAX: usize = 255;

/// Registration submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub first_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

/// A registration that passed validation. The password is still plain text.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = required(&mut errors, "username", &self.username);
        if !username.is_empty() {
            max_length(&mut errors, "username", &username, USERNAME_MAX);
            if !is_valid_username(&username) {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            }
        }

        let first_name = self.first_name.trim().to_string();
        max_length(&mut errors, "first_name", &first_name, NAME_MAX);

        let email_address = self.email.trim().to_string();
        email(&mut errors, "email", &email_address);

        if self.password.is_empty() {
            errors.add("password", super::REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", super::REQUIRED);
        } else if self.password != self.password2 {
            errors.add("password2", "Passwords don't match.");
        }

        errors.into_result(NewAccount {
            username,
            first_name,
            email: email_address,
            password: self.password.clone(),
        })
    }
}

/// Usernames may hold letters, digits and `@ . + - _`.
fn is_valid_username(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Sign-in submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.add("password", super::REQUIRED);
        }
        errors.into_result((username, self.password.clone()))
    }
}

/// Editable user fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEditForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEditForm {
    pub bio: String,
    pub photo: String,
}

/// The account edit page posts user and profile fields in one body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountEditForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
    pub photo: String,
}

impl AccountEditForm {
    pub fn split(self) -> (UserEditForm, ProfileEditForm) {
        (
            UserEditForm {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            },
            ProfileEditForm {
                bio: self.bio,
                photo: self.photo,
            },
        )
    }
}

/// Cleaned user fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Cleaned profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileChanges {
    pub bio: String,
    pub photo: Option<String>,
}

impl UserEditForm {
    pub fn validate(&self) -> Result<AccountChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim().to_string();
        max_length(&mut errors, "first_name", &first_name, NAME_MAX);
        let last_name = self.last_name.trim().to_string();
        max_length(&mut errors, "last_name", &last_name, NAME_MAX);
        let email_address = self.email.trim().to_string();
        email(&mut errors, "email", &email_address);

        errors.into_result(AccountChanges {
            first_name,
            last_name,
            email: email_address,
        })
    }
}

impl ProfileEditForm {
    pub fn validate(&self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let photo = self.photo.trim();
        max_length(&mut errors, "photo", photo, PHOTO_MAX);

        errors.into_result(ProfileChanges {
            bio: self.bio.trim().to_string(),
            photo: (!photo.is_empty()).then(|| photo.to_string()),
        })
    }
}
