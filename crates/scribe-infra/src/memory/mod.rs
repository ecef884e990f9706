//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

mod posts;
mod records;

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::error::RepoError;
use scribe_core::ports::BaseRepository;

pub use posts::InMemoryPostRepository;
pub use records::{
    InMemoryCommentRepository, InMemoryProfileRepository, InMemoryTagRepository,
    InMemoryUserRepository,
};

/// A storable entity.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Value that must be unique across the table, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

/// Generic in-memory repository over a `HashMap` behind an async `RwLock`.
pub struct InMemoryRepository<T: Record> {
    pub(crate) rows: RwLock<HashMap<Uuid, T>>,
    _record: PhantomData<T>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            _record: PhantomData,
        }
    }

    /// Rows matching `predicate`, in no particular order.
    pub(crate) async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.rows.write().await;

        if let Some(key) = entity.unique_key() {
            let clash = rows
                .values()
                .any(|row| row.id() != entity.id() && row.unique_key().as_ref() == Some(&key));
            if clash {
                return Err(RepoError::Constraint(format!("duplicate key {}", key)));
            }
        }

        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}
