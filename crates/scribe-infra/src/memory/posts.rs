use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use scribe_core::domain::{Post, PublishDate};
use scribe_core::error::RepoError;
use scribe_core::pagination::PageWindow;
use scribe_core::ports::{PostRepository, PostScope, ScoredPost};
use scribe_core::text::similarity;

use super::{InMemoryRepository, Record};

pub type InMemoryPostRepository = InMemoryRepository<Post>;

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

fn in_scope(post: &Post, scope: PostScope) -> bool {
    match scope {
        PostScope::Published { tag_id } => {
            post.is_published_at(Utc::now())
                && tag_id.is_none_or(|id| post.tags.iter().any(|tag| tag.id == id))
        }
        PostScope::AuthoredBy(author_id) => post.author_id == author_id,
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_published(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let now = Utc::now();
        Ok(self
            .rows
            .read()
            .await
            .get(&id)
            .filter(|post| post.is_published_at(now))
            .cloned())
    }

    async fn find_published_by_date(
        &self,
        date: PublishDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let now = Utc::now();
        Ok(self
            .filter(|post| {
                post.slug == slug && date.contains(post.publish) && post.is_published_at(now)
            })
            .await
            .into_iter()
            .next())
    }

    async fn slug_taken(
        &self,
        date: PublishDate,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let clashes = self
            .filter(|post| {
                post.slug == slug && date.contains(post.publish) && Some(post.id) != exclude
            })
            .await;
        Ok(!clashes.is_empty())
    }

    async fn count(&self, scope: PostScope) -> Result<u64, RepoError> {
        Ok(self.filter(|post| in_scope(post, scope)).await.len() as u64)
    }

    async fn list(&self, scope: PostScope, window: PageWindow) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.filter(|post| in_scope(post, scope)).await;
        posts.sort_by(|a, b| b.publish.cmp(&a.publish));

        Ok(posts
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect())
    }

    async fn search_published(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<ScoredPost>, RepoError> {
        let now = Utc::now();
        let mut scored: Vec<ScoredPost> = self
            .filter(|post| post.is_published_at(now))
            .await
            .into_iter()
            .map(|post| ScoredPost {
                similarity: similarity(&post.title, query),
                post,
            })
            .filter(|hit| hit.similarity > threshold)
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| b.post.publish.cmp(&a.post.publish))
        });
        Ok(scored)
    }
}
