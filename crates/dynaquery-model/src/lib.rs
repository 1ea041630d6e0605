//! Document store model types for Dynaquery.
//!
//! These are the request and response shapes exchanged with the key-value
//! document store. They serialize to the store's `PascalCase` JSON protocol so
//! an assembled command can be dumped verbatim for inspection.
// "DynamoDB" appears in a number of doc comments in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::{StoreError, StoreErrorCode};
pub use input::{BatchGetItemInput, GetItemInput, PutItemInput};
pub use operations::StoreOperation;
pub use output::{BatchGetItemOutput, GetItemOutput, PutItemOutput};
pub use types::{
    ConsumedCapacity, Item, ItemCollectionMetrics, Key, KeysAndAttributes, ResponseMetadata,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics,
};
