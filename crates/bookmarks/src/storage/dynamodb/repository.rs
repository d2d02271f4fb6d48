//! DynamoDB repository implementation.
//!
//! Implements `BookmarkRepository` from `bookmarks_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnConsumedCapacity};
use aws_sdk_dynamodb::Client;
use uuid::Uuid;

use bookmarks_core::bookmark::{Bookmark, ETag};
use bookmarks_core::storage::{
    BookmarkRepository, DeleteResponse, ItemResponse, QueryPage, RepositoryError, Result,
};

use super::conversions::{
    bookmark_to_item, continuation_token, item_to_bookmark, request_charge, start_key,
    ETAG_ATTRIBUTE,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error, PutCondition,
};
use super::keys;

const ENTITY_TYPE: &str = "Bookmark";

/// DynamoDB-based repository implementation.
///
/// The SDK client is cheap to clone and safe to share; one instance serves
/// every request.
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Creates a new repository using the AWS SDK default credential chain.
    ///
    /// `endpoint_url` overrides the service endpoint, e.g. for DynamoDB Local.
    pub async fn connect(table_name: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), table_name)
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Writes the bookmark with a fresh token, guarded by `guard`.
    async fn put(&self, bookmark: &Bookmark, guard: WriteGuard<'_>) -> Result<ItemResponse<Bookmark>> {
        let etag = ETag::quoted(Uuid::new_v4());
        let item = bookmark_to_item(bookmark, &etag);

        let request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .return_consumed_capacity(ReturnConsumedCapacity::Total);

        let request = match guard {
            WriteGuard::Absent => request.condition_expression("attribute_not_exists(PK)"),
            WriteGuard::Matches(expected) => request
                .condition_expression("#etag = :expected")
                .expression_attribute_names("#etag", ETAG_ATTRIBUTE)
                .expression_attribute_values(
                    ":expected",
                    AttributeValue::S(expected.as_str().to_string()),
                ),
            WriteGuard::None => request,
        };

        let condition = match guard {
            WriteGuard::Absent => PutCondition::NotExists,
            WriteGuard::Matches(_) | WriteGuard::None => PutCondition::EtagMatches,
        };

        let output = request
            .send()
            .await
            .map_err(|e| map_put_item_error(e, condition, ENTITY_TYPE, bookmark.key()))?;

        Ok(ItemResponse {
            resource: bookmark.clone().with_etag(etag.clone()),
            etag,
            request_charge: request_charge(output.consumed_capacity()),
        })
    }
}

/// Condition attached to a `PutItem`.
#[derive(Debug, Clone, Copy)]
enum WriteGuard<'a> {
    /// The key must not exist yet.
    Absent,
    /// The stored token must equal this one.
    Matches(&'a ETag),
    None,
}

#[async_trait]
impl BookmarkRepository for DynamoDbRepository {
    async fn create_item(&self, bookmark: &Bookmark) -> Result<ItemResponse<Bookmark>> {
        self.put(bookmark, WriteGuard::Absent).await
    }

    async fn read_item(&self, user_id: &str, id: &str) -> Result<ItemResponse<Bookmark>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(keys::PK, AttributeValue::S(keys::user_pk(user_id)))
            .key(keys::SK, AttributeValue::S(keys::bookmark_sk(id)))
            // Tokens must reflect the latest committed write.
            .consistent_read(true)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_get_item_error)?;

        let charge = request_charge(result.consumed_capacity());
        let item = result.item.ok_or_else(|| RepositoryError::NotFound {
            entity_type: ENTITY_TYPE,
            id: format!("{user_id}/{id}"),
        })?;

        let resource = item_to_bookmark(&item)?;
        let etag = resource
            .etag
            .clone()
            .ok_or_else(|| RepositoryError::InvalidData("Stored bookmark has no etag".into()))?;

        Ok(ItemResponse {
            resource,
            etag,
            request_charge: charge,
        })
    }

    async fn upsert_item(
        &self,
        bookmark: &Bookmark,
        if_match: Option<&ETag>,
    ) -> Result<ItemResponse<Bookmark>> {
        let guard = match if_match {
            Some(expected) => WriteGuard::Matches(expected),
            None => WriteGuard::None,
        };
        self.put(bookmark, guard).await
    }

    async fn delete_item(&self, user_id: &str, id: &str) -> Result<DeleteResponse> {
        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(keys::PK, AttributeValue::S(keys::user_pk(user_id)))
            .key(keys::SK, AttributeValue::S(keys::bookmark_sk(id)))
            .condition_expression("attribute_exists(PK)")
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, ENTITY_TYPE, format!("{user_id}/{id}")))?;

        Ok(DeleteResponse {
            request_charge: request_charge(output.consumed_capacity()),
        })
    }

    async fn query_by_user(
        &self,
        user_id: &str,
        continuation: Option<String>,
        max_items: usize,
    ) -> Result<QueryPage<Bookmark>> {
        let limit = i32::try_from(max_items.max(1)).unwrap_or(i32::MAX);

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(keys::user_pk(user_id)))
            .expression_attribute_values(
                ":sk_prefix",
                AttributeValue::S(keys::bookmark_sk_prefix().to_string()),
            )
            .limit(limit)
            .set_exclusive_start_key(start_key(user_id, continuation))
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(map_query_error)?;

        let request_charge = request_charge(result.consumed_capacity());
        let continuation = continuation_token(result.last_evaluated_key.as_ref());
        let items = result
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_bookmark)
            .collect::<Result<Vec<_>>>()?;

        Ok(QueryPage {
            items,
            continuation,
            request_charge,
        })
    }
}
