//! In-memory repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bookmarks_core::bookmark::{Bookmark, ETag};
use bookmarks_core::storage::{
    BookmarkRepository, DeleteResponse, ItemResponse, QueryPage, RepositoryError, Result,
};

const ENTITY_TYPE: &str = "Bookmark";

/// Charge reported for a point read or a query page.
const READ_CHARGE: f64 = 1.0;
/// Charge reported for a create or upsert.
const WRITE_CHARGE: f64 = 5.0;
/// Charge reported for a delete.
const DELETE_CHARGE: f64 = 1.0;

/// Bookmarks of one user, ordered by id so pages are stable.
type Partition = BTreeMap<String, Bookmark>;

/// In-memory storage backend.
///
/// Each stored bookmark carries the token of its committed state; every write
/// mints a fresh token.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    partitions: Arc<RwLock<HashMap<String, Partition>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps the bookmark with a fresh token and returns the stored copy.
    fn commit(bookmark: &Bookmark) -> Bookmark {
        bookmark.clone().with_etag(ETag::quoted(Uuid::new_v4()))
    }

    fn written(stored: Bookmark) -> Result<ItemResponse<Bookmark>> {
        let etag = stored
            .etag
            .clone()
            .ok_or_else(|| RepositoryError::InvalidData("Stored bookmark has no etag".into()))?;
        Ok(ItemResponse {
            resource: stored,
            etag,
            request_charge: WRITE_CHARGE,
        })
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryRepository {
    async fn create_item(&self, bookmark: &Bookmark) -> Result<ItemResponse<Bookmark>> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(bookmark.user_id.clone()).or_default();

        if partition.contains_key(&bookmark.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: ENTITY_TYPE,
                id: bookmark.key(),
            });
        }

        let stored = Self::commit(bookmark);
        partition.insert(stored.id.clone(), stored.clone());
        Self::written(stored)
    }

    async fn read_item(&self, user_id: &str, id: &str) -> Result<ItemResponse<Bookmark>> {
        let partitions = self.partitions.read().await;
        let stored = partitions
            .get(user_id)
            .and_then(|partition| partition.get(id))
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: ENTITY_TYPE,
                id: format!("{user_id}/{id}"),
            })?;

        let etag = stored
            .etag
            .clone()
            .ok_or_else(|| RepositoryError::InvalidData("Stored bookmark has no etag".into()))?;

        Ok(ItemResponse {
            resource: stored,
            etag,
            request_charge: READ_CHARGE,
        })
    }

    async fn upsert_item(
        &self,
        bookmark: &Bookmark,
        if_match: Option<&ETag>,
    ) -> Result<ItemResponse<Bookmark>> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(bookmark.user_id.clone()).or_default();

        if let Some(expected) = if_match {
            let current = partition.get(&bookmark.id).and_then(|b| b.etag.as_ref());
            if current != Some(expected) {
                return Err(RepositoryError::PreconditionFailed {
                    entity_type: ENTITY_TYPE,
                    id: bookmark.key(),
                });
            }
        }

        let stored = Self::commit(bookmark);
        partition.insert(stored.id.clone(), stored.clone());
        Self::written(stored)
    }

    async fn delete_item(&self, user_id: &str, id: &str) -> Result<DeleteResponse> {
        let mut partitions = self.partitions.write().await;
        let removed = partitions
            .get_mut(user_id)
            .and_then(|partition| partition.remove(id));

        if removed.is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: ENTITY_TYPE,
                id: format!("{user_id}/{id}"),
            });
        }

        Ok(DeleteResponse {
            request_charge: DELETE_CHARGE,
        })
    }

    async fn query_by_user(
        &self,
        user_id: &str,
        continuation: Option<String>,
        max_items: usize,
    ) -> Result<QueryPage<Bookmark>> {
        let max_items = max_items.max(1);
        let partitions = self.partitions.read().await;

        let Some(partition) = partitions.get(user_id) else {
            return Ok(QueryPage {
                items: Vec::new(),
                continuation: None,
                request_charge: READ_CHARGE,
            });
        };

        // The continuation token is the id of the last item already returned.
        let lower = match continuation {
            Some(last_id) => Bound::Excluded(last_id),
            None => Bound::Unbounded,
        };

        let mut remaining = partition.range((lower, Bound::Unbounded));
        let items: Vec<Bookmark> = remaining
            .by_ref()
            .take(max_items)
            .map(|(_, b)| b.clone())
            .collect();

        let continuation = match (remaining.next(), items.last()) {
            (Some(_), Some(last)) => Some(last.id.clone()),
            _ => None,
        };

        Ok(QueryPage {
            items,
            continuation,
            request_charge: READ_CHARGE,
        })
    }
}
