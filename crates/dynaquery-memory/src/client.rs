//! [`DocumentClient`] over in-process tables.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dynaquery_core::DocumentClient;
use dynaquery_model::{
    BatchGetItemInput, BatchGetItemOutput, ConsumedCapacity, GetItemInput, GetItemOutput, Item,
    PutItemInput, PutItemOutput, ResponseMetadata, ReturnConsumedCapacity, StoreError,
    StoreOperation,
};
use tracing::debug;

use crate::config::MemoryStoreConfig;
use crate::evaluate::{apply_projection, evaluate_condition};
use crate::state::MemoryState;
use crate::storage::{KeySchema, StorageError, calculate_item_size};

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::validation(format!("One or more parameter values were invalid: {e}"))
    }
}

/// Calls received per operation.
#[derive(Debug, Default)]
struct CallCounters {
    get_item: AtomicU64,
    batch_get_item: AtomicU64,
    put_item: AtomicU64,
}

impl CallCounters {
    fn counter(&self, op: StoreOperation) -> &AtomicU64 {
        match op {
            StoreOperation::GetItem => &self.get_item,
            StoreOperation::BatchGetItem => &self.batch_get_item,
            StoreOperation::PutItem => &self.put_item,
        }
    }

    fn record(&self, op: StoreOperation) {
        self.counter(op).fetch_add(1, Ordering::Relaxed);
    }
}

/// A document store held in memory.
///
/// Batch reads serve keys in request order (tables sorted by name) until the
/// configured key or size limit is hit; the rest come back as unprocessed
/// keys, as the hosted store does under load.
#[derive(Debug, Default)]
pub struct MemoryClient {
    state: MemoryState,
    config: MemoryStoreConfig,
    calls: CallCounters,
}

impl MemoryClient {
    /// A store with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with explicit limits.
    #[must_use]
    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active limits.
    #[must_use]
    pub fn config(&self) -> &MemoryStoreConfig {
        &self.config
    }

    /// The table registry.
    #[must_use]
    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    /// Create an empty table.
    pub fn create_table(
        &self,
        name: impl Into<String>,
        key_schema: KeySchema,
    ) -> Result<(), StoreError> {
        self.state.create_table(name, key_schema).map(|_| ())
    }

    /// Write `items` into `table` unconditionally. Returns how many were written.
    pub fn seed(
        &self,
        table: &str,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<usize, StoreError> {
        let table = self.state.require_table(table)?;
        let mut written = 0;
        for item in items {
            table.storage.put_item(item)?;
            written += 1;
        }
        debug!(table = %table.name, written, "seeded table");
        Ok(written)
    }

    /// Remove every item of `table`.
    pub fn truncate(&self, table: &str) -> Result<(), StoreError> {
        self.state.require_table(table)?.storage.clear();
        Ok(())
    }

    /// Number of `op` calls received so far.
    #[must_use]
    pub fn calls(&self, op: StoreOperation) -> u64 {
        self.calls.counter(op).load(Ordering::Relaxed)
    }

    /// Zero all call counters.
    pub fn reset_calls(&self) {
        for op in [
            StoreOperation::GetItem,
            StoreOperation::BatchGetItem,
            StoreOperation::PutItem,
        ] {
            self.calls.counter(op).store(0, Ordering::Relaxed);
        }
    }

    fn metadata() -> ResponseMetadata {
        ResponseMetadata {
            http_status_code: Some(200),
            request_id: Some(uuid::Uuid::new_v4().to_string()),
            attempts: Some(1),
        }
    }
}

/// Capacity units for reading `bytes`: one unit per 4 KiB, halved for
/// eventually consistent reads.
#[allow(clippy::cast_precision_loss)]
fn read_units(bytes: u64, consistent: bool) -> f64 {
    let units = bytes.div_ceil(4096).max(1) as f64;
    if consistent { units } else { units / 2.0 }
}

/// Capacity units for writing `bytes`: one unit per KiB.
#[allow(clippy::cast_precision_loss)]
fn write_units(bytes: u64) -> f64 {
    bytes.div_ceil(1024).max(1) as f64
}

fn capacity(
    requested: Option<ReturnConsumedCapacity>,
    table: &str,
    units: f64,
    read: bool,
) -> Option<ConsumedCapacity> {
    requested
        .filter(ReturnConsumedCapacity::should_report)
        .map(|_| ConsumedCapacity {
            table_name: Some(table.to_owned()),
            capacity_units: Some(units),
            read_capacity_units: read.then_some(units),
            write_capacity_units: (!read).then_some(units),
        })
}

#[async_trait]
impl DocumentClient for MemoryClient {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, StoreError> {
        self.calls.record(StoreOperation::GetItem);
        let table = self.state.require_table(&input.table_name)?;
        let item = table.storage.get_by_key(&input.key)?;

        let size = item.as_ref().map_or(0, calculate_item_size);
        let item = match (item, input.projection_expression.as_deref()) {
            (Some(item), Some(projection)) => Some(apply_projection(
                &item,
                projection,
                &input.expression_attribute_names,
            )?),
            (item, _) => item,
        };

        Ok(GetItemOutput {
            item,
            consumed_capacity: capacity(
                input.return_consumed_capacity,
                &table.name,
                read_units(size, input.consistent_read.unwrap_or(false)),
                true,
            ),
            metadata: Self::metadata(),
        })
    }

    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, StoreError> {
        self.calls.record(StoreOperation::BatchGetItem);
        if input.key_count() == 0 {
            return Err(StoreError::validation(
                "The requested list of keys must not be empty",
            ));
        }

        let mut tables: Vec<_> = input.request_items.iter().collect();
        tables.sort_by(|a, b| a.0.cmp(b.0));

        let mut output = BatchGetItemOutput {
            metadata: Self::metadata(),
            ..Default::default()
        };
        let mut served = 0_usize;
        let mut bytes = 0_u64;

        for (name, request) in tables {
            let table = self.state.require_table(name)?;
            let mut items = Vec::new();
            let mut pending = Vec::new();
            let mut table_bytes = 0_u64;

            for key in &request.keys {
                let full = self.config.batch_page_size.is_some_and(|n| served >= n);
                if full || !pending.is_empty() {
                    pending.push(key.clone());
                    continue;
                }
                let Some(item) = table.storage.get_by_key(key)? else {
                    served += 1;
                    continue;
                };
                let size = calculate_item_size(&item);
                if served > 0 && bytes + size > self.config.max_page_bytes {
                    pending.push(key.clone());
                    continue;
                }
                served += 1;
                bytes += size;
                table_bytes += size;
                items.push(match request.projection_expression.as_deref() {
                    Some(projection) => {
                        apply_projection(&item, projection, &request.expression_attribute_names)?
                    }
                    None => item,
                });
            }

            if let Some(cc) = capacity(
                input.return_consumed_capacity,
                name,
                read_units(table_bytes, request.consistent_read.unwrap_or(false)),
                true,
            ) {
                output.consumed_capacity.push(cc);
            }
            if !pending.is_empty() {
                debug!(
                    table = %name,
                    served = items.len(),
                    unprocessed = pending.len(),
                    "batch read limit reached"
                );
                output
                    .unprocessed_keys
                    .insert(name.clone(), request.with_keys(pending));
            }
            output.responses.insert(name.clone(), items);
        }

        Ok(output)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, StoreError> {
        self.calls.record(StoreOperation::PutItem);
        let table = self.state.require_table(&input.table_name)?;
        let size = calculate_item_size(&input.item);

        let condition = input.condition_expression.as_deref();
        let names: &HashMap<String, String> = &input.expression_attribute_names;
        table.storage.put_item_if(input.item, |existing| {
            match condition {
                Some(condition) if !evaluate_condition(existing, condition, names)? => Err(
                    StoreError::conditional_check_failed("The conditional request failed"),
                ),
                _ => Ok(()),
            }
        })?;

        Ok(PutItemOutput {
            consumed_capacity: capacity(
                input.return_consumed_capacity,
                &table.name,
                write_units(size),
                false,
            ),
            item_collection_metrics: None,
            metadata: Self::metadata(),
        })
    }
}
