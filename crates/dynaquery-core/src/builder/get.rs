//! Single-item lookup.

use std::sync::Arc;

use async_trait::async_trait;
use dynaquery_model::{GetItemInput, GetItemOutput, Key, StoreOperation};
use tracing::debug;

use super::{QueryBuilder, ReadOptions};
use crate::client::DocumentClient;
use crate::error::{QueryError, QueryResult};
use crate::expression::ProjectionExpression;

/// Fetch one item by primary key.
pub struct FindOne<C: ?Sized> {
    client: Arc<C>,
    input: GetItemInput,
}

impl<C: ?Sized> std::fmt::Debug for FindOne<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindOne")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentClient + ?Sized> FindOne<C> {
    pub(crate) fn new(client: Arc<C>, table: String, key: Key, options: ReadOptions) -> Self {
        Self {
            client,
            input: GetItemInput {
                table_name: table,
                key,
                consistent_read: options.consistent_read,
                return_consumed_capacity: options.return_consumed_capacity,
                ..Default::default()
            },
        }
    }

    /// Restrict the returned attributes to `fields`.
    ///
    /// An empty list selects every attribute again.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match ProjectionExpression::build(fields) {
            Some(projection) => {
                self.input.projection_expression = Some(projection.projection_expression);
                self.input.expression_attribute_names = projection.expression_attribute_names;
            }
            None => {
                self.input.projection_expression = None;
                self.input.expression_attribute_names.clear();
            }
        }
        self
    }
}

#[async_trait]
impl<C: DocumentClient + ?Sized> QueryBuilder for FindOne<C> {
    type Input = GetItemInput;
    type Output = GetItemOutput;

    fn input(&self) -> &GetItemInput {
        &self.input
    }

    async fn send(self) -> QueryResult<GetItemOutput> {
        let table = self.input.table_name.clone();
        let output = self
            .client
            .get_item(self.input)
            .await
            .map_err(|e| QueryError::store(StoreOperation::GetItem, e))?;
        debug!(table = %table, found = output.item.is_some(), "find completed");
        Ok(output)
    }
}
