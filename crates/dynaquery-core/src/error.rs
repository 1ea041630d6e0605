//! Error types for query building and execution.

use dynaquery_model::{StoreError, StoreOperation};

/// Failures of an alias registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An existing mapping contains an alias this registry would never produce.
    #[error("alias {alias} is not of the form {prefix}<index>")]
    WrongPrefix {
        /// The offending alias.
        alias: String,
        /// The prefix the registry expects.
        prefix: &'static str,
    },

    /// An existing mapping skips an index, so new aliases could collide.
    #[error("alias mapping is not contiguous: expected {expected}, found {found}")]
    NonContiguous {
        /// The alias that should have come next.
        expected: String,
        /// The alias that was found instead.
        found: String,
    },

    /// The registry was sealed against further registrations.
    #[error("alias registry is sealed")]
    Sealed,
}

/// Error returned by builder `send` calls.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The store (or the way to it) failed. Passed through untouched.
    #[error("{operation} failed: {source}")]
    Store {
        /// The operation that failed.
        operation: StoreOperation,
        /// The store's error.
        #[source]
        source: StoreError,
    },

    /// A caller-supplied condition rejected the write.
    #[error("condition check failed on {table}: {source}")]
    ConditionFailed {
        /// Target table.
        table: String,
        /// The store's error.
        #[source]
        source: StoreError,
    },

    /// An alias registry rejected an operation.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The key passed to an insert has no attributes.
    #[error("insert into {table} needs at least one key attribute")]
    MissingKey {
        /// Target table.
        table: String,
    },
}

impl QueryError {
    /// Wrap a store error raised by `operation`.
    #[must_use]
    pub fn store(operation: StoreOperation, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    /// The underlying store error, if this failure came from the store.
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store { source, .. } | Self::ConditionFailed { source, .. } => Some(source),
            Self::Registry(_) | Self::MissingKey { .. } => None,
        }
    }
}

/// Convenience result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
