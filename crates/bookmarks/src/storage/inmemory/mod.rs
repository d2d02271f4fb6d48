//! In-memory storage backend.
//!
//! Bookmarks live in per-user `BTreeMap`s behind a `tokio::sync::RwLock`.
//! Nothing is persisted; data is lost when the repository is dropped. Useful
//! for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! // Use repo for testing...
//! ```

mod repository;

pub use repository::InMemoryRepository;
