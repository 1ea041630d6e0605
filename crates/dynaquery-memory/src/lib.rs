//! An in-process document store.
//!
//! [`MemoryClient`] implements [`dynaquery_core::DocumentClient`] over tables
//! held in memory. It understands the projections and conditions the query
//! builders produce and can be configured to serve batch reads in several
//! pages, which makes it the store of choice for tests and local work.

pub mod client;
pub mod config;
pub mod evaluate;
pub mod state;
pub mod storage;

pub use client::MemoryClient;
pub use config::MemoryStoreConfig;
pub use storage::{KeySchema, KeyType};
