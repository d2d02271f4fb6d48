use thiserror::Error;

use crate::storage::RepositoryError;

use super::Bookmark;

/// Errors raised while validating a bookmark before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("Bookmark id is required")]
    MissingId,
    #[error("Bookmark userId (partition key) is required")]
    MissingUserId,
    #[error("Bookmark title is required")]
    MissingTitle,
    #[error("Invalid bookmark url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// Errors returned by the bookmark service.
///
/// Missing records and token mismatches are not errors: reads return
/// `Option`, deletes return `bool` and updates return [`UpdateOutcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] BookmarkError),
    #[error("A bookmark with id '{id}' for user '{user_id}' already exists")]
    AlreadyExists { user_id: String, id: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a conditional update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The write was committed; carries the stored record and its new token.
    Updated(Bookmark),
    /// The supplied token no longer matches the stored one. Nothing was written.
    PreconditionFailed,
}
