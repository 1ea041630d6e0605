//! Fluent query builders over a key-value document store.
//!
//! Start from [`Dynaquery`], pick a [`Table`], and build a command:
//!
//! - [`Table::find`] reads one item by key.
//! - [`Table::find_many`] reads many items by key, following the store's
//!   unprocessed keys until every key is served.
//! - [`Table::insert`] writes one item, optionally only if nothing exists
//!   under its key.
//!
//! Builders never put raw attribute names into expressions; names go through
//! generated aliases (see [`expression`]). Every builder implements
//! [`QueryBuilder`], whose `send` executes the command.

pub mod backoff;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod expression;


use std::sync::Arc;

use dynaquery_model::{Item, Key};

pub use builder::{
    ConflictPolicy, FindMany, FindOne, GetManyOutput, Insert, PutOutcome, QueryBuilder,
    ReadOptions, WriteOptions,
};
pub use client::DocumentClient;
pub use dynaquery_model as model;
pub use config::FetchConfig;
pub use error::{QueryError, QueryResult, RegistryError};

/// Entry point: a client plus the fetch settings shared by its tables.
pub struct Dynaquery<C: ?Sized> {
    client: Arc<C>,
    config: FetchConfig,
}

impl<C: ?Sized> std::fmt::Debug for Dynaquery<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynaquery")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentClient + ?Sized> Dynaquery<C> {
    /// Wrap `client` with the default fetch settings.
    pub fn new(client: Arc<C>) -> Self {
        Self::with_config(client, FetchConfig::default())
    }

    /// Wrap `client` with explicit fetch settings.
    pub fn with_config(client: Arc<C>, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// Builders bound to table `name`.
    pub fn table(&self, name: impl Into<String>) -> Table<C> {
        Table {
            client: Arc::clone(&self.client),
            name: name.into(),
            config: self.config,
        }
    }
}

/// Builders bound to one table.
pub struct Table<C: ?Sized> {
    client: Arc<C>,
    name: String,
    config: FetchConfig,
}

impl<C: ?Sized> std::fmt::Debug for Table<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentClient + ?Sized> Table<C> {
    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the item stored under `key`.
    pub fn find(&self, key: Key) -> FindOne<C> {
        self.find_with(key, ReadOptions::default())
    }

    /// [`find`](Self::find) with read options.
    pub fn find_with(&self, key: Key, options: ReadOptions) -> FindOne<C> {
        FindOne::new(Arc::clone(&self.client), self.name.clone(), key, options)
    }

    /// Read the items stored under each of `keys`.
    pub fn find_many(&self, keys: impl IntoIterator<Item = Key>) -> FindMany<C> {
        self.find_many_with(keys, ReadOptions::default())
    }

    /// [`find_many`](Self::find_many) with read options.
    pub fn find_many_with(
        &self,
        keys: impl IntoIterator<Item = Key>,
        options: ReadOptions,
    ) -> FindMany<C> {
        FindMany::new(
            Arc::clone(&self.client),
            self.name.clone(),
            keys.into_iter().collect(),
            options,
            self.config,
        )
    }

    /// Write `item` under `key`. Key attributes are merged into the item.
    pub fn insert(&self, key: Key, item: Item) -> Insert<C> {
        self.insert_with(key, item, WriteOptions::default())
    }

    /// [`insert`](Self::insert) with write options.
    pub fn insert_with(&self, key: Key, item: Item, options: WriteOptions) -> Insert<C> {
        Insert::new(
            Arc::clone(&self.client),
            self.name.clone(),
            key,
            item,
            options,
        )
    }
}
