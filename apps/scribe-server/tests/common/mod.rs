//! Shared fixtures for the HTTP tests: an in-memory application state with
//! cheap password hashing and a mailer that records what it was asked to send.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use scribe_core::domain::{Post, PostStatus, Profile, Tag, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{BaseRepository, EmailMessage, MailError, Mailer, ProfileRepository};
use scribe_infra::Argon2PasswordService;
use scribe_server::config::BlogSettings;
use scribe_server::state::AppState;

/// Build the full application around a state value.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure(scribe_server::handlers::configure_routes),
        )
        .await
    };
}

pub const PASSWORD: &str = "correct horse battery staple";

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _message: EmailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("relay unreachable".to_string()))
    }
}

/// Profile store whose writes always fail; reads find nothing.
pub struct UnavailableProfiles;

#[async_trait]
impl BaseRepository<Profile, Uuid> for UnavailableProfiles {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(None)
    }

    async fn save(&self, _entity: Profile) -> Result<Profile, RepoError> {
        Err(RepoError::Connection("connection reset".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::Connection("connection reset".to_string()))
    }
}

#[async_trait]
impl ProfileRepository for UnavailableProfiles {
    async fn find_by_user_id(&self, _user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(None)
    }
}

pub struct TestContext {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

pub fn context() -> TestContext {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::in_memory(BlogSettings::default())
        .with_passwords(Arc::new(
            Argon2PasswordService::with_params(8, 1, 1).unwrap(),
        ))
        .with_mailer(mailer.clone());

    TestContext { state, mailer }
}

/// Registered user with an empty profile.
pub async fn create_user(state: &AppState, username: &str) -> User {
    let hash = state.passwords.hash(PASSWORD).unwrap();
    let user = User::new(
        username.to_string(),
        format!("{}@example.com", username),
        hash,
    );
    let user = state.users.save(user).await.unwrap();
    state.profiles.save(Profile::empty(user.id)).await.unwrap();
    user
}

/// `Authorization` header for `user`.
pub fn bearer(state: &AppState, user: &User) -> (&'static str, String) {
    let token = state.tokens.generate_token(user.id, &user.username).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

pub async fn create_post(
    state: &AppState,
    author: &User,
    title: &str,
    slug: &str,
    status: PostStatus,
) -> Post {
    let post = Post::new(
        author.id,
        title.to_string(),
        slug.to_string(),
        format!("Body of {}", title),
        status,
    );
    state.posts.save(post).await.unwrap()
}

pub async fn create_tagged_post(state: &AppState, author: &User, title: &str, tag: &str) -> Post {
    let tag: Tag = state.tags.get_or_create(tag).await.unwrap();
    let mut post = Post::new(
        author.id,
        title.to_string(),
        scribe_core::text::slugify(title),
        format!("Body of {}", title),
        PostStatus::Published,
    );
    post.tags = vec![tag];
    state.posts.save(post).await.unwrap()
}

/// Published post whose publish time is still in the future.
pub async fn create_scheduled_post(state: &AppState, author: &User, title: &str) -> Post {
    let mut post = Post::new(
        author.id,
        title.to_string(),
        scribe_core::text::slugify(title),
        "Coming soon".to_string(),
        PostStatus::Published,
    );
    post.publish = Utc::now() + TimeDelta::days(1);
    state.posts.save(post).await.unwrap()
}
