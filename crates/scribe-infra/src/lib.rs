//! # Scribe Infrastructure
//!
//! Concrete implementations of the ports defined in `scribe-core`.
//! This crate contains the database, in-memory store, auth and mail
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and log-only mail
//! - `postgres` - PostgreSQL store via SeaORM
//! - `webhook-mail` - Deliver mail through an HTTP relay via reqwest

pub mod auth;
pub mod database;
pub mod mail;
pub mod memory;

// Re-exports - always available
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::DatabaseConfig;
pub use mail::LogMailer;
pub use memory::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryProfileRepository,
    InMemoryTagRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresProfileRepository,
    PostgresTagRepository, PostgresUserRepository,
};

#[cfg(feature = "webhook-mail")]
pub use mail::WebhookMailer;
