//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mail;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use mail::{EmailMessage, MailError, Mailer};
pub use repository::{
    BaseRepository, CommentRepository, PostRepository, PostScope, ProfileRepository,
    ScoredPost, TagRepository, UserRepository,
};
