//! Application configuration loaded from environment variables.

use std::env;

use scribe_core::pagination::DEFAULT_PER_PAGE;
use scribe_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub blog: BlogSettings,
    /// HTTP mail relay; `None` logs outgoing mail instead.
    pub mail_webhook_url: Option<String>,
    pub jwt: JwtConfig,
}

/// Settings handlers read at request time.
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Sender address of recommendation emails.
    pub mail_from: String,
    pub posts_per_page: u64,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            mail_from: "noreply@localhost".to_string(),
            posts_per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parse_var("DB_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parse_var("DB_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
                ..defaults
            }
        });

        let defaults = BlogSettings::default();
        let blog = BlogSettings {
            mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
            posts_per_page: parse_var::<u64>("POSTS_PER_PAGE")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            blog,
            mail_webhook_url: env::var("MAIL_WEBHOOK_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
