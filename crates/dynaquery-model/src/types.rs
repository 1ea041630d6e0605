//! Shared request/response building blocks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// A stored document: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// The key attributes of one item, by name.
pub type Key = HashMap<String, AttributeValue>;

/// Implements `as_str` and `Display` from the serde wire names.
macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// The name used on the wire.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// How much consumed capacity a response should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnConsumedCapacity {
    /// Per table and per index.
    Indexes,
    /// One total per table.
    Total,
    /// Nothing.
    #[default]
    None,
}

wire_enum!(ReturnConsumedCapacity {
    Indexes => "INDEXES",
    Total => "TOTAL",
    None => "NONE",
});

impl ReturnConsumedCapacity {
    /// Whether a capacity record belongs in the response.
    #[must_use]
    pub fn should_report(&self) -> bool {
        *self != Self::None
    }
}

/// Whether a write reports the size of the item collection it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnItemCollectionMetrics {
    /// Report size estimates.
    Size,
    /// Nothing.
    #[default]
    None,
}

wire_enum!(ReturnItemCollectionMetrics {
    Size => "SIZE",
    None => "NONE",
});

/// Capacity units one call spent on one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConsumedCapacity {
    /// Table charged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    /// Read plus write units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_units: Option<f64>,
    /// Read units, for reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_capacity_units: Option<f64>,
    /// Write units, for writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_capacity_units: Option<f64>,
}

/// Size metrics for the item collection touched by a write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemCollectionMetrics {
    /// Partition key of the collection.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub item_collection_key: HashMap<String, AttributeValue>,
    /// Lower and upper bound of the collection size estimate, in gigabytes.
    #[serde(
        rename = "SizeEstimateRangeGB",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub size_estimate_range_gb: Vec<f64>,
}

/// What the transport knows about one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Status code, for HTTP transports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
    /// Store-assigned request id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Attempts the client needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// The keys to read from a single table in a `BatchGetItem` call, together
/// with the read options applied to each of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeysAndAttributes {
    /// Keys still to read.
    pub keys: Vec<Key>,
    /// Aliased attribute list; unset means whole items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_expression: Option<String>,
    /// Alias to attribute name, for the projection.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub expression_attribute_names: HashMap<String, String>,
    /// Strongly consistent read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistent_read: Option<bool>,
}

impl KeysAndAttributes {
    /// Copy of these read options restricted to a different key set.
    #[must_use]
    pub fn with_keys(&self, keys: Vec<Key>) -> Self {
        Self {
            keys,
            ..self.clone()
        }
    }
}
