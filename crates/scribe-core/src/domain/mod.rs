//! Domain entities - the core business objects.

mod comment;
mod post;
mod profile;
mod tag;
mod user;

pub use comment::Comment;
pub use post::{Post, PostStatus, PublishDate};
pub use profile::Profile;
pub use tag::Tag;
pub use user::User;
