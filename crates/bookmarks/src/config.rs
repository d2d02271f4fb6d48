use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum items requested per query page when listing (default: 100)
    pub query_page_size: usize,
    /// DynamoDB table holding the bookmarks (default: "bookmarks")
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub dynamodb_table_name: String,
    /// Endpoint override for DynamoDB, e.g. a local container (default: none)
    /// Note: Only used when the `dynamodb` feature is enabled.
    #[allow(dead_code)]
    pub dynamodb_endpoint_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `QUERY_PAGE_SIZE` - Items per query page (default: 100, minimum: 1)
    /// - `DYNAMODB_TABLE_NAME` - DynamoDB table name (default: "bookmarks")
    /// - `DYNAMODB_ENDPOINT_URL` - DynamoDB endpoint override (default: unset)
    pub fn from_env() -> Self {
        Self {
            query_page_size: env::var("QUERY_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(100),
            dynamodb_table_name: env::var("DYNAMODB_TABLE_NAME")
                .unwrap_or_else(|_| "bookmarks".to_string()),
            dynamodb_endpoint_url: env::var("DYNAMODB_ENDPOINT_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("QUERY_PAGE_SIZE");
        env::remove_var("DYNAMODB_TABLE_NAME");
        env::remove_var("DYNAMODB_ENDPOINT_URL");

        let config = Config::from_env();

        assert_eq!(config.query_page_size, 100);
        assert_eq!(config.dynamodb_table_name, "bookmarks");
        assert_eq!(config.dynamodb_endpoint_url, None);
    }
}
