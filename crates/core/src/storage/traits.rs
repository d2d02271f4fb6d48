use async_trait::async_trait;

use crate::bookmark::{Bookmark, ETag};

use super::{DeleteResponse, ItemResponse, QueryPage, Result};

/// Item-level access to a partitioned bookmark store.
///
/// Every item is addressed by `(user_id, id)`, with `user_id` as the
/// partition key. Implementations must be safe to share across requests.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Inserts a new item.
    ///
    /// Fails with `AlreadyExists` when `(user_id, id)` is already present.
    async fn create_item(&self, bookmark: &Bookmark) -> Result<ItemResponse<Bookmark>>;

    /// Reads one item. Fails with `NotFound` when it is absent.
    async fn read_item(&self, user_id: &str, id: &str) -> Result<ItemResponse<Bookmark>>;

    /// Inserts or replaces an item.
    ///
    /// With `if_match`, the write only commits when the stored token equals it;
    /// otherwise (including when the item does not exist) it fails with
    /// `PreconditionFailed`.
    async fn upsert_item(
        &self,
        bookmark: &Bookmark,
        if_match: Option<&ETag>,
    ) -> Result<ItemResponse<Bookmark>>;

    /// Removes one item. Fails with `NotFound` when it is absent.
    async fn delete_item(&self, user_id: &str, id: &str) -> Result<DeleteResponse>;

    /// Reads one page of the items in a user's partition.
    async fn query_by_user(
        &self,
        user_id: &str,
        continuation: Option<String>,
        max_items: usize,
    ) -> Result<QueryPage<Bookmark>>;
}
