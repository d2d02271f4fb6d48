use chrono::Utc;
use serde::Deserialize;

use bookmarks_core::bookmark::{
    validate_keys, validate_title, validate_url, Bookmark, BookmarkError,
};

/// Request body for creating or replacing a bookmark.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Absent and `null` both mean no tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl BookmarkRequest {
    /// Validates the request and converts it into a Bookmark stamped with the
    /// current time.
    pub fn into_bookmark(self) -> Result<Bookmark, BookmarkError> {
        let bookmark = Bookmark {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            url: self.url,
            tags: self.tags.unwrap_or_default(),
            notes: self.notes,
            created_at: Utc::now(),
            etag: None,
        };

        validate_keys(&bookmark)?;
        validate_title(&bookmark.title)?;
        validate_url(&bookmark.url)?;

        Ok(bookmark)
    }
}
