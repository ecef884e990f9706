use async_trait::async_trait;
use uuid::Uuid;

use scribe_core::domain::{Comment, Profile, Tag, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    BaseRepository, CommentRepository, ProfileRepository, TagRepository, UserRepository,
};
use scribe_core::text::slugify;

use super::{InMemoryRepository, Record};

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryProfileRepository = InMemoryRepository<Profile>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;
pub type InMemoryTagRepository = InMemoryRepository<Tag>;

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.username.clone())
    }
}

impl Record for Profile {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.user_id.to_string())
    }
}

impl Record for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Tag {
    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.slug.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");
        Ok(self
            .filter(|user| user.username == username)
            .await
            .into_iter()
            .next())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, RepoError> {
        Ok(self
            .filter(|profile| profile.user_id == user_id)
            .await
            .into_iter()
            .next())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self
            .filter(|comment| comment.post_id == post_id && comment.active)
            .await;
        comments.sort_by_key(|comment| comment.created_at);
        Ok(comments)
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self
            .filter(|tag| tag.slug == slug)
            .await
            .into_iter()
            .next())
    }

    async fn get_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let slug = slugify(name);
        match self.find_by_slug(&slug).await? {
            Some(tag) => Ok(tag),
            None => self.save(Tag::new(name)).await,
        }
    }
}
