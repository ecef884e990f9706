use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Profile, PublishDate, Tag, User};
use crate::error::RepoError;
use crate::pagination::PageWindow;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their (unique) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Profile repository.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, Uuid> {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError>;
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// Posts visible to readers, optionally restricted to one tag.
    Published { tag_id: Option<Uuid> },
    /// Every post of one author, whatever its status.
    AuthoredBy(Uuid),
}

/// A post with its search score.
#[derive(Debug, Clone)]
pub struct ScoredPost {
    pub post: Post,
    pub similarity: f32,
}

/// Post repository.
///
/// "Published" always means status `published` and a publish timestamp
/// that is not in the future.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a published post by id.
    async fn find_published(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Find the published post with `slug` published on `date`.
    async fn find_published_by_date(
        &self,
        date: PublishDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Whether any post other than `exclude` uses `slug` on `date`.
    async fn slug_taken(
        &self,
        date: PublishDate,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;

    /// Count the posts in `scope`.
    async fn count(&self, scope: PostScope) -> Result<u64, RepoError>;

    /// Fetch one window of the posts in `scope`, newest first.
    async fn list(&self, scope: PostScope, window: PageWindow) -> Result<Vec<Post>, RepoError>;

    /// Published posts whose title similarity to `query` exceeds `threshold`,
    /// most similar first.
    async fn search_published(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<ScoredPost>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Active comments of a post, oldest first.
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Return the tag with the label's slug, creating it when missing.
    async fn get_or_create(&self, name: &str) -> Result<Tag, RepoError>;
}
