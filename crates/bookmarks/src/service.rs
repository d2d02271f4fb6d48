//! Bookmark service.
//!
//! Translates bookmark operations into repository calls and turns store
//! signals (missing item, key conflict, stale token) into domain results.

use std::sync::Arc;

use chrono::Utc;

use bookmarks_core::bookmark::{validate_keys, Bookmark, ETag, ServiceError, UpdateOutcome};
use bookmarks_core::storage::{BookmarkRepository, RepositoryError};

/// Operations over the bookmark store.
///
/// Cheap to clone; every clone shares the same repository handle.
#[derive(Clone)]
pub struct BookmarkService {
    repo: Arc<dyn BookmarkRepository>,
    page_size: usize,
}

impl BookmarkService {
    /// Creates a service over `repo`, listing `page_size` items per query page.
    pub fn new(repo: Arc<dyn BookmarkRepository>, page_size: usize) -> Self {
        Self {
            repo,
            page_size: page_size.max(1),
        }
    }

    /// Stores a new bookmark and returns it with its token.
    pub async fn create(&self, bookmark: Bookmark) -> Result<Bookmark, ServiceError> {
        validate_keys(&bookmark)?;

        match self.repo.create_item(&bookmark).await {
            Ok(response) => {
                tracing::info!(
                    op = "Create",
                    charge = response.request_charge,
                    status = "Created",
                    etag = %response.etag,
                    "Store call"
                );
                tracing::debug!(key = %bookmark.key(), "Create diagnostics");
                Ok(response.resource)
            }
            Err(RepositoryError::AlreadyExists { .. }) => {
                tracing::warn!(
                    user_id = %bookmark.user_id,
                    id = %bookmark.id,
                    "Create conflict"
                );
                Err(ServiceError::AlreadyExists {
                    user_id: bookmark.user_id,
                    id: bookmark.id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Point read. A missing bookmark is `None`.
    pub async fn get_by_id(&self, user_id: &str, id: &str) -> Result<Option<Bookmark>, ServiceError> {
        match self.repo.read_item(user_id, id).await {
            Ok(response) => {
                tracing::info!(
                    op = "Read",
                    charge = response.request_charge,
                    status = "OK",
                    etag = %response.etag,
                    "Store call"
                );
                Ok(Some(response.resource))
            }
            Err(RepositoryError::NotFound { .. }) => {
                tracing::info!(user_id, id, "Not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every bookmark of one user, following continuation tokens to the end.
    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Bookmark>, ServiceError> {
        let mut items = Vec::new();
        let mut total_charge = 0.0;
        let mut continuation = None;

        loop {
            let page = self
                .repo
                .query_by_user(user_id, continuation, self.page_size)
                .await?;
            tracing::debug!(
                user_id,
                page_items = page.items.len(),
                charge = page.request_charge,
                "Query page"
            );

            total_charge += page.request_charge;
            items.extend(page.items);

            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        tracing::info!(
            op = "Query GetAll",
            count = items.len(),
            charge = total_charge,
            "Store call"
        );
        Ok(items)
    }

    /// Replaces the stored bookmark, guarded by `expected` when present.
    ///
    /// `createdAt` is reset to now. A stale token is reported as
    /// [`UpdateOutcome::PreconditionFailed`], never retried.
    pub async fn update(
        &self,
        bookmark: Bookmark,
        expected: Option<ETag>,
    ) -> Result<UpdateOutcome, ServiceError> {
        validate_keys(&bookmark)?;
        let bookmark = bookmark.with_created_at(Utc::now());

        match self.repo.upsert_item(&bookmark, expected.as_ref()).await {
            Ok(response) => {
                tracing::info!(
                    op = "Upsert",
                    charge = response.request_charge,
                    status = "OK",
                    etag = %response.etag,
                    "Store call"
                );
                Ok(UpdateOutcome::Updated(response.resource))
            }
            Err(RepositoryError::PreconditionFailed { .. }) => {
                tracing::warn!(
                    key = %bookmark.key(),
                    expected = expected.as_ref().map(ETag::as_str).unwrap_or_default(),
                    "ETag mismatch"
                );
                Ok(UpdateOutcome::PreconditionFailed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a bookmark. `false` when there was nothing to remove.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool, ServiceError> {
        match self.repo.delete_item(user_id, id).await {
            Ok(response) => {
                tracing::info!(
                    op = "Delete",
                    charge = response.request_charge,
                    status = "NoContent",
                    "Store call"
                );
                Ok(true)
            }
            Err(RepositoryError::NotFound { .. }) => {
                tracing::info!(user_id, id, "Already gone");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
