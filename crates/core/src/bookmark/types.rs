use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque concurrency token assigned by the store on every write.
///
/// Tokens are kept in their quoted form (`"..."`) so they can be copied
/// verbatim into an `ETag` response header and compared verbatim against an
/// `If-Match` request header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Wraps an already formatted token.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds a quoted token from any displayable version marker.
    pub fn quoted(version: impl Display) -> Self {
        Self(format!("\"{version}\""))
    }

    /// Interprets an `If-Match` header value.
    ///
    /// An absent or blank header and the `*` wildcard all mean "no condition",
    /// so the update proceeds unconditionally. The wildcard deliberately does
    /// not mean "the resource must already exist".
    pub fn from_if_match(header: Option<&str>) -> Option<Self> {
        let value = header?.trim();
        if value.is_empty() || value == "*" {
            return None;
        }
        Some(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ETag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved link, partitioned by the user that owns it.
///
/// `(user_id, id)` identifies a bookmark. The `id` is chosen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    /// Partition key.
    pub user_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Token of the stored state this value was read from or written as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<ETag>,
}

impl Bookmark {
    /// Creates a bookmark stamped with the current time and no token.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: title.into(),
            url: url.into(),
            tags: Vec::new(),
            notes: None,
            created_at: Utc::now(),
            etag: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attaches the concurrency token reported by the store.
    pub fn with_etag(mut self, etag: ETag) -> Self {
        self.etag = Some(etag);
        self
    }

    /// Human readable `user_id/id` key, used in logs and error messages.
    pub fn key(&self) -> String {
        format!("{}/{}", self.user_id, self.id)
    }
}
