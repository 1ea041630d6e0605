//! [`DocumentClient`] over the AWS SDK.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::RequestId;
use dynaquery_core::DocumentClient;
use dynaquery_model::{
    BatchGetItemInput, BatchGetItemOutput, GetItemInput, GetItemOutput, PutItemInput,
    PutItemOutput, ResponseMetadata, StoreError,
};
use tracing::debug;

use crate::convert::{
    from_sdk_capacity, from_sdk_item, from_sdk_keys_and_attributes, from_sdk_metrics, non_empty,
    store_error, to_sdk_item, to_sdk_keys_and_attributes, to_sdk_return_capacity,
    to_sdk_return_metrics, to_sdk_value,
};

/// DynamoDB, reached through a configured SDK client.
#[derive(Debug, Clone)]
pub struct AwsClient {
    inner: aws_sdk_dynamodb::Client,
}

impl AwsClient {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(inner: aws_sdk_dynamodb::Client) -> Self {
        Self { inner }
    }

    /// The wrapped SDK client.
    #[must_use]
    pub fn inner(&self) -> &aws_sdk_dynamodb::Client {
        &self.inner
    }
}

fn metadata(output: &impl RequestId) -> ResponseMetadata {
    ResponseMetadata {
        request_id: output.request_id().map(str::to_owned),
        ..Default::default()
    }
}

#[async_trait]
impl DocumentClient for AwsClient {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, StoreError> {
        let output = self
            .inner
            .get_item()
            .table_name(input.table_name)
            .set_key(Some(to_sdk_item(input.key)))
            .set_consistent_read(input.consistent_read)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_return_consumed_capacity(
                input
                    .return_consumed_capacity
                    .map(to_sdk_return_capacity),
            )
            .send()
            .await
            .map_err(store_error)?;

        Ok(GetItemOutput {
            item: output.item().cloned().map(from_sdk_item).transpose()?,
            consumed_capacity: output.consumed_capacity().map(from_sdk_capacity),
            metadata: metadata(&output),
        })
    }

    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, StoreError> {
        let request_items = input
            .request_items
            .into_iter()
            .map(|(table, ka)| Ok((table, to_sdk_keys_and_attributes(ka)?)))
            .collect::<Result<HashMap<_, _>, StoreError>>()?;

        let output = self
            .inner
            .batch_get_item()
            .set_request_items(Some(request_items))
            .set_return_consumed_capacity(
                input
                    .return_consumed_capacity
                    .map(to_sdk_return_capacity),
            )
            .send()
            .await
            .map_err(store_error)?;

        let mut responses = HashMap::new();
        for (table, items) in output.responses().cloned().unwrap_or_default() {
            let items = items
                .into_iter()
                .map(from_sdk_item)
                .collect::<Result<Vec<_>, _>>()?;
            responses.insert(table, items);
        }

        let mut unprocessed_keys = HashMap::new();
        for (table, ka) in output.unprocessed_keys().into_iter().flatten() {
            unprocessed_keys.insert(table.clone(), from_sdk_keys_and_attributes(ka)?);
        }
        debug!(
            tables = responses.len(),
            unprocessed_tables = unprocessed_keys.len(),
            "batch_get_item returned"
        );

        Ok(BatchGetItemOutput {
            responses,
            unprocessed_keys,
            consumed_capacity: output
                .consumed_capacity()
                .iter()
                .map(from_sdk_capacity)
                .collect(),
            metadata: metadata(&output),
        })
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, StoreError> {
        let values = input
            .expression_attribute_values
            .into_iter()
            .map(|(alias, v)| (alias, to_sdk_value(v)))
            .collect();

        let output = self
            .inner
            .put_item()
            .table_name(input.table_name)
            .set_item(Some(to_sdk_item(input.item)))
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(values))
            .set_return_consumed_capacity(
                input
                    .return_consumed_capacity
                    .map(to_sdk_return_capacity),
            )
            .set_return_item_collection_metrics(
                input
                    .return_item_collection_metrics
                    .map(to_sdk_return_metrics),
            )
            .send()
            .await
            .map_err(store_error)?;

        Ok(PutItemOutput {
            consumed_capacity: output.consumed_capacity().map(from_sdk_capacity),
            item_collection_metrics: output
                .item_collection_metrics()
                .map(from_sdk_metrics)
                .transpose()?,
            metadata: metadata(&output),
        })
    }
}
