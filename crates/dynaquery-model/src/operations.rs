//! Store operation enum.

use std::fmt;

/// The store operations issued by the query builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Get an item by primary key.
    GetItem,
    /// Get many items, possibly across several calls.
    BatchGetItem,
    /// Put (insert or replace) an item.
    PutItem,
}

impl StoreOperation {
    /// Returns the operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetItem => "GetItem",
            Self::BatchGetItem => "BatchGetItem",
            Self::PutItem => "PutItem",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
