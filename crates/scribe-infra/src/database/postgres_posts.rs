//! PostgreSQL post repository.
//!
//! Posts carry their tags, so this repository writes the `post_tags` join
//! rows alongside the post and loads them back with every read.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, FromQueryResult, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, TransactionTrait, Value,
};
use uuid::Uuid;

use scribe_core::domain::{Post, PublishDate};
use scribe_core::error::RepoError;
use scribe_core::pagination::PageWindow;
use scribe_core::ports::{BaseRepository, PostRepository, PostScope, ScoredPost};

use super::entity::post::{self, Entity as PostEntity, Status};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::Entity as TagEntity;
use super::postgres_base::{query_error, upsert, write_error};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

#[derive(Debug, FromQueryResult)]
struct SimilarityRow {
    id: Uuid,
    similarity: f32,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Status is published and the publish timestamp has passed.
    fn published() -> Condition {
        Condition::all()
            .add(post::Column::Status.eq(Status::Published))
            .add(post::Column::Publish.lte(Utc::now()))
    }

    fn on_date(date: PublishDate) -> Condition {
        let (start, end) = date.bounds();
        Condition::all()
            .add(post::Column::Publish.gte(start))
            .add(post::Column::Publish.lt(end))
    }

    fn scoped(scope: PostScope) -> Select<PostEntity> {
        match scope {
            PostScope::Published { tag_id: None } => PostEntity::find().filter(Self::published()),
            PostScope::Published {
                tag_id: Some(tag_id),
            } => PostEntity::find().filter(Self::published()).filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            ),
            PostScope::AuthoredBy(author_id) => {
                PostEntity::find().filter(post::Column::AuthorId.eq(author_id))
            }
        }
    }

    async fn with_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let tags = models
            .load_many_to_many(TagEntity, PostTagEntity, &self.db)
            .await
            .map_err(query_error)?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| model.into_domain(tags))
            .collect())
    }

    async fn one_with_tags(&self, model: Option<post::Model>) -> Result<Option<Post>, RepoError> {
        let Some(model) = model else {
            return Ok(None);
        };

        let tags = model
            .find_related(TagEntity)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(Some(model.into_domain(tags)))
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        self.one_with_tags(model).await
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        upsert(post::ActiveModel::from(&entity), &txn)
            .await
            .map_err(write_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(entity.id))
            .exec(&txn)
            .await
            .map_err(write_error)?;

        if !entity.tags.is_empty() {
            let links = entity.tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: sea_orm::Set(entity.id),
                tag_id: sea_orm::Set(tag.id),
            });
            PostTagEntity::insert_many(links)
                .exec(&txn)
                .await
                .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;

        tracing::debug!(post_id = %entity.id, slug = %entity.slug, "Post saved");
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_published(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .filter(Self::published())
            .one(&self.db)
            .await
            .map_err(query_error)?;

        self.one_with_tags(model).await
    }

    async fn find_published_by_date(
        &self,
        date: PublishDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find()
            .filter(Self::published())
            .filter(Self::on_date(date))
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        self.one_with_tags(model).await
    }

    async fn slug_taken(
        &self,
        date: PublishDate,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let mut select = PostEntity::find()
            .filter(Self::on_date(date))
            .filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude {
            select = select.filter(post::Column::Id.ne(id));
        }

        let count = select.count(&self.db).await.map_err(query_error)?;
        Ok(count > 0)
    }

    async fn count(&self, scope: PostScope) -> Result<u64, RepoError> {
        Self::scoped(scope)
            .count(&self.db)
            .await
            .map_err(query_error)
    }

    async fn list(&self, scope: PostScope, window: PageWindow) -> Result<Vec<Post>, RepoError> {
        let models = Self::scoped(scope)
            .order_by_desc(post::Column::Publish)
            .offset(window.offset)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_tags(models).await
    }

    async fn search_published(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<ScoredPost>, RepoError> {
        tracing::debug!(query, threshold, "Trigram search over post titles");

        let rows = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .column_as(
                Expr::cust_with_values("similarity(title, $1)", [query.to_owned()]),
                "similarity",
            )
            .filter(Self::published())
            .filter(Expr::cust_with_values(
                "similarity(title, $1) > $2",
                [Value::from(query.to_owned()), Value::from(threshold)],
            ))
            .into_model::<SimilarityRow>()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let models = PostEntity::find()
            .filter(post::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;
        let posts = self.with_tags(models).await?;

        let mut scored: Vec<ScoredPost> = posts
            .into_iter()
            .filter_map(|post| {
                rows.iter()
                    .find(|row| row.id == post.id)
                    .map(|row| ScoredPost {
                        similarity: row.similarity,
                        post,
                    })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| b.post.publish.cmp(&a.post.publish))
        });

        Ok(scored)
    }
}
