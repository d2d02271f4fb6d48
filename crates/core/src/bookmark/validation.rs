//! Pure validation functions for bookmarks.

use url::Url;

use super::{Bookmark, BookmarkError};

/// Checks the fields every store operation needs: `id` and `user_id`.
pub fn validate_keys(bookmark: &Bookmark) -> Result<(), BookmarkError> {
    if bookmark.id.trim().is_empty() {
        return Err(BookmarkError::MissingId);
    }
    if bookmark.user_id.trim().is_empty() {
        return Err(BookmarkError::MissingUserId);
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), BookmarkError> {
    if title.trim().is_empty() {
        return Err(BookmarkError::MissingTitle);
    }
    Ok(())
}

/// Schemes a bookmark may point at.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Accepts only absolute `http`, `https` or `ftp` URLs without surrounding
/// whitespace.
pub fn validate_url(url: &str) -> Result<(), BookmarkError> {
    let invalid = |reason: String| BookmarkError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    if url.trim() != url {
        return Err(invalid("surrounding whitespace".to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    Ok(())
}
