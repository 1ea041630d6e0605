//! Table registry of the memory store.

use std::sync::Arc;

use dashmap::DashMap;
use dynaquery_model::StoreError;

use crate::storage::{KeySchema, TableStorage};

/// A named table and its items.
#[derive(Debug)]
pub struct MemoryTable {
    /// Table name.
    pub name: String,
    /// Item storage.
    pub storage: TableStorage,
}

/// All tables of a memory store, keyed by name.
#[derive(Debug, Default)]
pub struct MemoryState {
    tables: DashMap<String, Arc<MemoryTable>>,
}

impl MemoryState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<Arc<MemoryTable>> {
        self.tables.get(name).map(|r| Arc::clone(r.value()))
    }

    /// Get a table or return `ResourceNotFoundException`.
    pub fn require_table(&self, name: &str) -> Result<Arc<MemoryTable>, StoreError> {
        self.get_table(name).ok_or_else(|| {
            StoreError::resource_not_found(format!(
                "Requested resource not found: Table: {name} not found"
            ))
        })
    }

    /// Create a table. Fails if one with the same name exists.
    pub fn create_table(
        &self,
        name: impl Into<String>,
        key_schema: KeySchema,
    ) -> Result<Arc<MemoryTable>, StoreError> {
        let name = name.into();
        match self.tables.entry(name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(e) => Err(StoreError::validation(format!(
                "Table already exists: {}",
                e.key()
            ))),
            dashmap::mapref::entry::Entry::Vacant(e) => {
                let table = Arc::new(MemoryTable {
                    name,
                    storage: TableStorage::new(key_schema),
                });
                e.insert(Arc::clone(&table));
                Ok(table)
            }
        }
    }
}
