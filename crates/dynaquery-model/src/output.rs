//! Output types for the three store operations the query layer drives.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, KeysAndAttributes, ResponseMetadata,
};

/// Response to a single-item read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// `None` when nothing is stored under the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,

    /// Capacity spent, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Transport details of this response.
    #[serde(rename = "$metadata", default)]
    pub metadata: ResponseMetadata,
}

/// One page of a batch read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemOutput {
    /// Items served, per table, in no particular order.
    #[serde(default)]
    pub responses: HashMap<String, Vec<Item>>,

    /// Keys the store did not get to in this call, in the same shape as the
    /// request's `RequestItems` so they can be sent back verbatim.
    #[serde(default)]
    pub unprocessed_keys: HashMap<String, KeysAndAttributes>,

    /// Capacity spent, one record per table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumed_capacity: Vec<ConsumedCapacity>,

    /// Transport details of this response.
    #[serde(rename = "$metadata", default)]
    pub metadata: ResponseMetadata,
}

impl BatchGetItemOutput {
    /// Returns `true` if at least one table still has keys to read.
    #[must_use]
    pub fn has_unprocessed_keys(&self) -> bool {
        self.unprocessed_keys.values().any(|ka| !ka.keys.is_empty())
    }
}

/// Response to a write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemOutput {
    /// Capacity spent, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_capacity: Option<ConsumedCapacity>,

    /// Size of the touched item collection, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_collection_metrics: Option<ItemCollectionMetrics>,

    /// Transport details of this response.
    #[serde(rename = "$metadata", default)]
    pub metadata: ResponseMetadata,
}
