//! Multi-key fetch with transparent pagination.
//!
//! The store may serve only part of a batch request and hand the rest back as
//! unprocessed keys. [`FindMany::pages`] keeps re-requesting the remainder,
//! waiting a full-jitter backoff between calls, until nothing is outstanding.
//! Pages are fetched strictly one after another.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dynaquery_model::{
    BatchGetItemInput, BatchGetItemOutput, ConsumedCapacity, Item, Key, KeysAndAttributes,
    ResponseMetadata, StoreOperation,
};
use futures::{Stream, TryStreamExt};
use serde::Serialize;
use tracing::debug;

use super::{QueryBuilder, ReadOptions};
use crate::backoff::backoff;
use crate::client::DocumentClient;
use crate::config::FetchConfig;
use crate::error::{QueryError, QueryResult};
use crate::expression::ProjectionExpression;

/// Consolidated result of a multi-key fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetManyOutput {
    /// Every item returned, in page order.
    pub items: Vec<Item>,
    /// One metadata record per page, in page order.
    pub metadata: Vec<ResponseMetadata>,
    /// Capacity reports of every page, if requested.
    pub consumed_capacity: Vec<ConsumedCapacity>,
}

impl GetManyOutput {
    /// Number of store calls that produced this result.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.metadata.len()
    }

    fn absorb(&mut self, table: &str, mut page: BatchGetItemOutput) {
        if let Some(items) = page.responses.remove(table) {
            self.items.extend(items);
        }
        self.metadata.push(page.metadata);
        self.consumed_capacity.extend(page.consumed_capacity);
    }
}

/// Fetch many items of one table by key.
pub struct FindMany<C: ?Sized> {
    client: Arc<C>,
    table: String,
    config: FetchConfig,
    input: BatchGetItemInput,
}

impl<C: ?Sized> std::fmt::Debug for FindMany<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FindMany")
            .field("table", &self.table)
            .field("config", &self.config)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentClient + ?Sized> FindMany<C> {
    pub(crate) fn new(
        client: Arc<C>,
        table: String,
        keys: Vec<Key>,
        options: ReadOptions,
        config: FetchConfig,
    ) -> Self {
        let request = KeysAndAttributes {
            keys,
            consistent_read: options.consistent_read,
            ..Default::default()
        };
        Self {
            client,
            config,
            input: BatchGetItemInput {
                request_items: HashMap::from([(table.clone(), request)]),
                return_consumed_capacity: options.return_consumed_capacity,
            },
            table,
        }
    }

    /// Restrict the returned attributes to `fields` on every page.
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let projection = ProjectionExpression::build(fields);
        if let Some(request) = self.input.request_items.get_mut(&self.table) {
            match projection {
                Some(p) => {
                    request.projection_expression = Some(p.projection_expression);
                    request.expression_attribute_names = p.expression_attribute_names;
                }
                None => {
                    request.projection_expression = None;
                    request.expression_attribute_names.clear();
                }
            }
        }
        self
    }

    /// Cap the delay between pages, in milliseconds.
    #[must_use]
    pub fn max_backoff(mut self, max_backoff_ms: u64) -> Self {
        self.config = self.config.with_max_backoff_ms(max_backoff_ms);
        self
    }

    /// The pages of this fetch, lazily, one store call each.
    ///
    /// The stream ends once the store reports no unprocessed keys, or right
    /// away when no keys were requested. Draining it is what
    /// [`send`](QueryBuilder::send) does.
    pub fn pages(self) -> impl Stream<Item = QueryResult<BatchGetItemOutput>> + Send {
        let template = self
            .input
            .request_items
            .get(&self.table)
            .cloned()
            .unwrap_or_default();
        let remaining = (!template.keys.is_empty()).then_some(self.input);
        let cursor = Cursor {
            client: self.client,
            table: self.table,
            config: self.config,
            template,
            remaining,
            page: 0,
        };
        futures::stream::try_unfold(cursor, Cursor::advance)
    }
}

/// Pagination state carried between pages.
struct Cursor<C: ?Sized> {
    client: Arc<C>,
    table: String,
    config: FetchConfig,
    /// Read options of the first request, re-applied to every later page.
    template: KeysAndAttributes,
    /// `None` once the store reported nothing outstanding.
    remaining: Option<BatchGetItemInput>,
    page: u32,
}

impl<C: DocumentClient + ?Sized> Cursor<C> {
    async fn advance(mut self) -> QueryResult<Option<(BatchGetItemOutput, Self)>> {
        let Some(request) = self.remaining.take() else {
            return Ok(None);
        };

        if self.page > 0 {
            let delay = backoff(self.page, &self.config).await;
            debug!(
                table = %self.table,
                page = self.page,
                delay = ?delay,
                "backed off before next page"
            );
        }

        let return_consumed_capacity = request.return_consumed_capacity;
        let output = self
            .client
            .batch_get_item(request)
            .await
            .map_err(|e| QueryError::store(StoreOperation::BatchGetItem, e))?;
        self.page += 1;

        let unprocessed: Vec<Key> = output
            .unprocessed_keys
            .get(&self.table)
            .map(|ka| ka.keys.clone())
            .unwrap_or_default();
        debug!(
            table = %self.table,
            page = self.page,
            items = output.responses.get(&self.table).map_or(0, Vec::len),
            unprocessed = unprocessed.len(),
            "fetched page"
        );

        if output.has_unprocessed_keys() {
            let mut request_items = HashMap::new();
            for (table, pending) in &output.unprocessed_keys {
                if pending.keys.is_empty() {
                    continue;
                }
                let next = if *table == self.table {
                    self.template.with_keys(unprocessed.clone())
                } else {
                    pending.clone()
                };
                request_items.insert(table.clone(), next);
            }
            self.remaining = Some(BatchGetItemInput {
                request_items,
                return_consumed_capacity,
            });
        }

        Ok(Some((output, self)))
    }
}

#[async_trait]
impl<C: DocumentClient + ?Sized> QueryBuilder for FindMany<C> {
    type Input = BatchGetItemInput;
    type Output = GetManyOutput;

    fn input(&self) -> &BatchGetItemInput {
        &self.input
    }

    async fn send(self) -> QueryResult<GetManyOutput> {
        let table = self.table.clone();
        let mut pages = Box::pin(self.pages());
        let mut output = GetManyOutput::default();
        while let Some(page) = pages.try_next().await? {
            output.absorb(&table, page);
        }
        debug!(
            table = %table,
            items = output.items.len(),
            pages = output.page_count(),
            "find_many completed"
        );
        Ok(output)
    }
}
