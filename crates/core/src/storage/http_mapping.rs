//! Pure functions for mapping storage and service errors to HTTP status codes.

use super::RepositoryError;
use crate::bookmark::ServiceError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `PreconditionFailed` -> 412 (Precondition Failed)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 500 (Internal Server Error)
///
/// `InvalidData` describes a stored item that could not be decoded, which is
/// a server fault rather than a client one.
///
/// # Examples
///
/// ```
/// use bookmarks_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::PreconditionFailed {
///     entity_type: "Bookmark",
///     id: "u1/b1".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 412);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::PreconditionFailed { .. } => 412,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// Validation failures are client errors (400), duplicates are conflicts
/// (409) and repository failures defer to [`repository_error_to_status_code`].
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::Validation(_) => 400,
        ServiceError::AlreadyExists { .. } => 409,
        ServiceError::Repository(repo_error) => repository_error_to_status_code(repo_error),
    }
}
