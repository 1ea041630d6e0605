//! Fluent builders, one per store operation.
//!
//! Every builder owns its request payload and an `Arc` to the client. The
//! payload can be inspected before sending through [`QueryBuilder::input`].

use async_trait::async_trait;
use dynaquery_model::{ReturnConsumedCapacity, ReturnItemCollectionMetrics};
use serde::Serialize;

use crate::error::QueryResult;

pub mod get;
pub mod get_many;
pub mod put;

pub use get::FindOne;
pub use get_many::{FindMany, GetManyOutput};
pub use put::{ConflictPolicy, Insert, PutOutcome};

/// A built command that can be inspected and then sent.
#[async_trait]
pub trait QueryBuilder: Send + Sized {
    /// The request payload handed to the store.
    type Input: Serialize;
    /// What `send` resolves to.
    type Output;

    /// The request as it would be sent right now.
    fn input(&self) -> &Self::Input;

    /// The request rendered as pretty-printed JSON, for diagnostics.
    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.input())
    }

    /// Execute the command.
    async fn send(self) -> QueryResult<Self::Output>;
}

/// Options shared by the read builders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Request a strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Ask the store to report consumed capacity.
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
}

impl ReadOptions {
    /// Strongly consistent read, no capacity reporting.
    #[must_use]
    pub fn consistent() -> Self {
        Self {
            consistent_read: Some(true),
            ..Self::default()
        }
    }
}

/// Options for the write builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Ask the store to report consumed capacity.
    pub return_consumed_capacity: Option<ReturnConsumedCapacity>,
    /// Ask the store to report item collection metrics.
    pub return_item_collection_metrics: Option<ReturnItemCollectionMetrics>,
}
