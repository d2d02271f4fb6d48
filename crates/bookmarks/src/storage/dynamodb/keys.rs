//! DynamoDB key generation functions.
//!
//! Pure functions for generating partition and sort keys. All functions are
//! sync and have no side effects.

// ============================================================================
// Key prefixes
// ============================================================================

pub const USER_PREFIX: &str = "USER#";
pub const BOOKMARK_PREFIX: &str = "BOOKMARK#";

/// Attribute names of the table's primary key.
pub const PK: &str = "PK";
pub const SK: &str = "SK";

/// Generate the partition key shared by all of a user's bookmarks.
///
/// Pattern: `USER#<user_id>`
pub fn user_pk(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}")
}

/// Generate sort key for a Bookmark.
///
/// Pattern: `BOOKMARK#<bookmark_id>`
pub fn bookmark_sk(id: &str) -> String {
    format!("{BOOKMARK_PREFIX}{id}")
}

/// Sort key prefix matching every bookmark in a partition.
///
/// Pattern: `BOOKMARK#`
pub fn bookmark_sk_prefix() -> &'static str {
    BOOKMARK_PREFIX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_pk() {
        assert_eq!(user_pk("u1"), "USER#u1");
    }

    #[test]
    fn test_bookmark_sk() {
        assert_eq!(bookmark_sk("b1"), "BOOKMARK#b1");
    }

    #[test]
    fn test_prefix_matches_sort_keys() {
        assert!(bookmark_sk("anything").starts_with(bookmark_sk_prefix()));
    }
}
