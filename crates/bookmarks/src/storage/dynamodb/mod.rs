//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of
//! `BookmarkRepository` using `aws-sdk-dynamodb`. All bookmarks share one
//! table; a user's bookmarks share a partition key.

mod conversions;
mod error;
mod keys;
mod repository;

pub use repository::DynamoDbRepository;
