//! Application state.
//!
//! This module defines the shared state passed to all request handlers. The
//! storage backend behind the service is chosen via feature flags.

use std::sync::Arc;

use bookmarks_core::storage::BookmarkRepository;

use crate::config::Config;
use crate::service::BookmarkService;

/// Shared application state.
///
/// Cloned for each request handler; every clone shares the same repository.
#[derive(Clone)]
pub struct AppState {
    /// Bookmark operations over the configured store.
    pub bookmarks: BookmarkService,
}

impl AppState {
    /// Creates a new AppState over the given repository and configuration.
    fn build(repo: Arc<dyn BookmarkRepository>, config: &Config) -> Self {
        Self {
            bookmarks: BookmarkService::new(repo, config.query_page_size),
        }
    }
}

// ============================================================================
// Factory functions for different storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!("Using in-memory bookmark store");
            Ok(Self::build(Arc::new(InMemoryRepository::new()), config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb {
    use super::*;
    use crate::storage::DynamoDbRepository;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = DynamoDbRepository::connect(
                config.dynamodb_table_name.clone(),
                config.dynamodb_endpoint_url.as_deref(),
            )
            .await;
            tracing::info!(
                table = repo.table_name(),
                endpoint = config.dynamodb_endpoint_url.as_deref().unwrap_or("default"),
                "Using DynamoDB bookmark store"
            );
            Ok(Self::build(Arc::new(repo), config))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl Default for AppState {
        /// Creates an AppState with in-memory storage for testing.
        fn default() -> Self {
            let config = Config::default();
            Self::build(Arc::new(InMemoryRepository::new()), &config)
        }
    }
}
