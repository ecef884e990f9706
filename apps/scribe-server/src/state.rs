//! Application state - shared across all handlers.

use std::sync::Arc;

use scribe_core::ports::{
    CommentRepository, Mailer, PasswordService, PostRepository, ProfileRepository, TagRepository,
    TokenService, UserRepository,
};
use scribe_infra::{
    Argon2PasswordService, InMemoryCommentRepository, InMemoryPostRepository,
    InMemoryProfileRepository, InMemoryTagRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, LogMailer,
};

#[cfg(feature = "postgres")]
use scribe_infra::{
    PostgresCommentRepository, PostgresPostRepository, PostgresProfileRepository,
    PostgresTagRepository, PostgresUserRepository,
};

use crate::config::{AppConfig, BlogSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub passwords: Arc<dyn PasswordService>,
    pub tokens: Arc<dyn TokenService>,
    pub blog: BlogSettings,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = Self::in_memory(config.blog.clone())
            .with_tokens(Arc::new(JwtTokenService::new(config.jwt.clone())))
            .with_mailer(build_mailer(config.mail_webhook_url.as_deref()));

        #[cfg(feature = "postgres")]
        let state = match &config.database {
            Some(db_config) => match scribe_infra::database::connect(db_config).await {
                Ok(db) => state.with_postgres(db),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    state
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                state
            }
        };

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored - built without the postgres feature");
        }

        tracing::info!(
            posts_per_page = state.blog.posts_per_page,
            mail_from = %state.blog.mail_from,
            "Application state initialized"
        );

        state
    }

    /// State backed entirely by in-memory repositories, with a log-only
    /// mailer and default auth services.
    pub fn in_memory(blog: BlogSettings) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            profiles: Arc::new(InMemoryProfileRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            tags: Arc::new(InMemoryTagRepository::new()),
            mailer: Arc::new(LogMailer),
            passwords: Arc::new(Argon2PasswordService::new()),
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            blog,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_passwords(mut self, passwords: Arc<dyn PasswordService>) -> Self {
        self.passwords = passwords;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenService>) -> Self {
        self.tokens = tokens;
        self
    }

    #[cfg(feature = "postgres")]
    fn with_postgres(mut self, db: sea_orm::DbConn) -> Self {
        self.users = Arc::new(PostgresUserRepository::new(db.clone()));
        self.profiles = Arc::new(PostgresProfileRepository::new(db.clone()));
        self.posts = Arc::new(PostgresPostRepository::new(db.clone()));
        self.comments = Arc::new(PostgresCommentRepository::new(db.clone()));
        self.tags = Arc::new(PostgresTagRepository::new(db));
        self
    }
}

fn build_mailer(webhook_url: Option<&str>) -> Arc<dyn Mailer> {
    match webhook_url {
        #[cfg(feature = "webhook-mail")]
        Some(url) => {
            tracing::info!("Mail relay configured");
            Arc::new(scribe_infra::WebhookMailer::new(url.to_string()))
        }
        #[cfg(not(feature = "webhook-mail"))]
        Some(_) => {
            tracing::warn!("MAIL_WEBHOOK_URL ignored - built without the webhook-mail feature");
            Arc::new(LogMailer)
        }
        None => {
            tracing::info!("No mail relay configured - outgoing mail is logged only");
            Arc::new(LogMailer)
        }
    }
}
