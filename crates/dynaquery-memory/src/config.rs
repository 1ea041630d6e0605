//! Memory store configuration.

use std::env;

/// Largest response a single batch call returns, matching the hosted store.
pub const DEFAULT_MAX_PAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Settings controlling how the memory store splits batch reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStoreConfig {
    /// Maximum number of keys served per batch call. `None` means no limit.
    pub batch_page_size: Option<usize>,
    /// Maximum total item size served per batch call.
    pub max_page_bytes: u64,
}

impl MemoryStoreConfig {
    /// Create configuration from environment variables.
    ///
    /// `DYNAQUERY_MEMORY_BATCH_PAGE_SIZE` sets the per-call key limit (unset or
    /// `0` for none); `DYNAQUERY_MEMORY_MAX_PAGE_BYTES` the per-call size limit.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            batch_page_size: env_usize("DYNAQUERY_MEMORY_BATCH_PAGE_SIZE").filter(|n| *n > 0),
            max_page_bytes: env::var("DYNAQUERY_MEMORY_MAX_PAGE_BYTES")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PAGE_BYTES),
        }
    }

    /// Serve at most `n` keys per batch call.
    #[must_use]
    pub fn with_batch_page_size(self, n: usize) -> Self {
        Self {
            batch_page_size: Some(n.max(1)),
            ..self
        }
    }
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            batch_page_size: None,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
