//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! bookmarks. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ConsumedCapacity};
use bookmarks_core::bookmark::{Bookmark, ETag};
use bookmarks_core::storage::RepositoryError;
use chrono::{DateTime, Utc};

use super::keys;

pub const ENTITY_TYPE_BOOKMARK: &str = "BOOKMARK";

/// Attribute holding the concurrency token.
pub const ETAG_ATTRIBUTE: &str = "etag";

/// Convert a Bookmark to a DynamoDB item stamped with the given token.
///
/// The token argument wins over any token already on the bookmark.
pub fn bookmark_to_item(bookmark: &Bookmark, etag: &ETag) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();

    // Keys
    item.insert(
        keys::PK.to_string(),
        AttributeValue::S(keys::user_pk(&bookmark.user_id)),
    );
    item.insert(
        keys::SK.to_string(),
        AttributeValue::S(keys::bookmark_sk(&bookmark.id)),
    );

    // Entity type
    item.insert(
        "entityType".to_string(),
        AttributeValue::S(ENTITY_TYPE_BOOKMARK.to_string()),
    );

    // Data
    item.insert("id".to_string(), AttributeValue::S(bookmark.id.clone()));
    item.insert(
        "userId".to_string(),
        AttributeValue::S(bookmark.user_id.clone()),
    );
    item.insert("title".to_string(), AttributeValue::S(bookmark.title.clone()));
    item.insert("url".to_string(), AttributeValue::S(bookmark.url.clone()));
    item.insert(
        "tags".to_string(),
        AttributeValue::L(
            bookmark
                .tags
                .iter()
                .map(|tag| AttributeValue::S(tag.clone()))
                .collect(),
        ),
    );
    if let Some(notes) = &bookmark.notes {
        item.insert("notes".to_string(), AttributeValue::S(notes.clone()));
    }
    item.insert(
        "createdAt".to_string(),
        AttributeValue::S(bookmark.created_at.to_rfc3339()),
    );
    item.insert(
        ETAG_ATTRIBUTE.to_string(),
        AttributeValue::S(etag.as_str().to_string()),
    );

    item
}

/// Convert a DynamoDB item to a Bookmark, token included.
pub fn item_to_bookmark(
    item: &HashMap<String, AttributeValue>,
) -> Result<Bookmark, RepositoryError> {
    Ok(Bookmark {
        id: get_string(item, "id")?,
        user_id: get_string(item, "userId")?,
        title: get_string(item, "title")?,
        url: get_string(item, "url")?,
        tags: get_string_list(item, "tags")?,
        notes: get_optional_string(item, "notes"),
        created_at: get_datetime(item, "createdAt")?,
        etag: Some(ETag::new(get_string(item, ETAG_ATTRIBUTE)?)),
    })
}

/// Extract the request charge from a response's consumed capacity.
pub fn request_charge(capacity: Option<&ConsumedCapacity>) -> f64 {
    capacity.and_then(|c| c.capacity_units()).unwrap_or(0.0)
}

/// Build the ExclusiveStartKey for a query page from a continuation token.
pub fn start_key(user_id: &str, continuation: Option<String>) -> Option<HashMap<String, AttributeValue>> {
    continuation.map(|sk| {
        HashMap::from([
            (keys::PK.to_string(), AttributeValue::S(keys::user_pk(user_id))),
            (keys::SK.to_string(), AttributeValue::S(sk)),
        ])
    })
}

/// Turn a LastEvaluatedKey into a continuation token (its sort key).
pub fn continuation_token(last_key: Option<&HashMap<String, AttributeValue>>) -> Option<String> {
    last_key
        .and_then(|key| key.get(keys::SK))
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
fn get_optional_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a list of strings; a missing attribute is an empty list.
fn get_string_list(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<Vec<String>, RepositoryError> {
    let Some(value) = item.get(key) else {
        return Ok(Vec::new());
    };
    let list = value
        .as_l()
        .map_err(|_| RepositoryError::InvalidData(format!("Field {} is not a list", key)))?;
    list.iter()
        .map(|v| {
            v.as_s().map(|s| s.to_string()).map_err(|_| {
                RepositoryError::InvalidData(format!("Field {} contains a non-string", key))
            })
        })
        .collect()
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(
    item: &HashMap<String, AttributeValue>,
    key: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bookmark() -> Bookmark {
        Bookmark::new("b1", "u1", "Rust", "https://www.rust-lang.org")
            .with_tags(["lang", "docs"])
            .with_notes("read later")
            .with_created_at(
                DateTime::parse_from_rfc3339("2025-01-15T10:30:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            )
    }

    #[test]
    fn test_bookmark_item_has_correct_keys() {
        let item = bookmark_to_item(&sample_bookmark(), &ETag::new("\"t1\""));

        assert_eq!(item.get("PK").unwrap().as_s().unwrap(), "USER#u1");
        assert_eq!(item.get("SK").unwrap().as_s().unwrap(), "BOOKMARK#b1");
        assert_eq!(item.get("entityType").unwrap().as_s().unwrap(), "BOOKMARK");
        assert_eq!(item.get("etag").unwrap().as_s().unwrap(), "\"t1\"");
    }

    #[test]
    fn test_item_to_bookmark_attaches_stored_etag() {
        let bookmark = sample_bookmark();
        let item = bookmark_to_item(&bookmark, &ETag::new("\"t2\""));

        let parsed = item_to_bookmark(&item).unwrap();

        assert_eq!(parsed, bookmark.with_etag(ETag::new("\"t2\"")));
    }

    #[test]
    fn test_tags_keep_their_order() {
        let item = bookmark_to_item(&sample_bookmark(), &ETag::new("\"t1\""));
        let parsed = item_to_bookmark(&item).unwrap();
        assert_eq!(parsed.tags, vec!["lang", "docs"]);
    }

    #[test]
    fn test_missing_notes_and_tags() {
        let mut item = bookmark_to_item(&sample_bookmark(), &ETag::new("\"t1\""));
        item.remove("notes");
        item.remove("tags");

        let parsed = item_to_bookmark(&item).unwrap();

        assert_eq!(parsed.notes, None);
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_missing_required_field_is_invalid_data() {
        let mut item = bookmark_to_item(&sample_bookmark(), &ETag::new("\"t1\""));
        item.remove("url");

        let result = item_to_bookmark(&item);

        assert_eq!(
            result,
            Err(RepositoryError::InvalidData(
                "Missing or invalid field: url".to_string()
            ))
        );
    }

    #[test]
    fn test_non_string_tag_is_invalid_data() {
        let mut item = bookmark_to_item(&sample_bookmark(), &ETag::new("\"t1\""));
        item.insert(
            "tags".to_string(),
            AttributeValue::L(vec![AttributeValue::N("1".to_string())]),
        );

        assert!(matches!(
            item_to_bookmark(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_request_charge() {
        let capacity = ConsumedCapacity::builder().capacity_units(2.5).build();
        assert_eq!(request_charge(Some(&capacity)), 2.5);
        assert_eq!(request_charge(None), 0.0);
    }

    #[test]
    fn test_continuation_round_trip_through_start_key() {
        let start = start_key("u1", Some("BOOKMARK#b7".to_string())).unwrap();

        assert_eq!(start.get("PK").unwrap().as_s().unwrap(), "USER#u1");
        assert_eq!(
            continuation_token(Some(&start)).as_deref(),
            Some("BOOKMARK#b7")
        );
        assert_eq!(start_key("u1", None), None);
        assert_eq!(continuation_token(None), None);
    }
}
