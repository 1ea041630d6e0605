//! The document store collaborator.

use async_trait::async_trait;
use dynaquery_model::{
    BatchGetItemInput, BatchGetItemOutput, GetItemInput, GetItemOutput, PutItemInput,
    PutItemOutput, StoreError,
};

/// A document store able to serve the operations the builders issue.
///
/// Implementations translate the model types to their transport. A missing
/// item is `Ok` with `item: None`. A rejected condition is an error whose code
/// is `ConditionalCheckFailedException`.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Fetch a single item by primary key.
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, StoreError>;

    /// Fetch up to one page of items by key. Keys not served in this call are
    /// returned in `unprocessed_keys`.
    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, StoreError>;

    /// Write a full item, honoring its condition expression if any.
    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, StoreError>;
}
