//! Requests for the three store operations the builders issue.
//!
//! Field names serialize in PascalCase. Unset options and empty alias maps are
//! left out, so a dumped request shows only what a builder actually set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;
use crate::types::{
    Item, Key, KeysAndAttributes, ReturnConsumedCapacity, ReturnItemCollectionMetrics,
};

/// Read one item by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemInput {
    /// Table to read.
    pub table_name: String,

    /// Every key attribute of the item.
    pub key: Key,

    /// Read the latest committed write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,

    /// Aliased attribute list; unset means the whole item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,

    /// Name aliases used by the expressions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Capacity reporting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

/// Read many items, possibly from several tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchGetItemInput {
    /// Keys and read options per table.
    pub request_items: HashMap<String, KeysAndAttributes>,

    /// Capacity reporting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl BatchGetItemInput {
    /// Total number of keys requested across all tables.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.request_items.values().map(|ka| ka.keys.len()).sum()
    }
}

/// Write one item, optionally under a condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemInput {
    /// Table to write.
    pub table_name: String,

    /// The full item, key attributes included.
    pub item: Item,

    /// Rejects the write when it evaluates to false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,

    /// Name aliases used by the expressions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,

    /// Value aliases used by the condition.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Capacity reporting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,

    /// Item collection size reporting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}
