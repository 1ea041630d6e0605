//! Query execution configuration.

use std::env;

/// Default cap on the delay between batch pages, in milliseconds.
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 500;

/// Default base delay of the backoff curve, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 100;

/// Settings for the batch fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on the delay between two pages.
    pub max_backoff_ms: u64,
    /// Delay scale: the uncapped bound before retry `n` is `base * 2^n`.
    pub base_delay_ms: u64,
}

impl FetchConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DYNAQUERY_MAX_BACKOFF_MS` | `500` |
    /// | `DYNAQUERY_BASE_DELAY_MS` | `100` |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_backoff_ms: env_u64("DYNAQUERY_MAX_BACKOFF_MS", DEFAULT_MAX_BACKOFF_MS),
            base_delay_ms: env_u64("DYNAQUERY_BASE_DELAY_MS", DEFAULT_BASE_DELAY_MS),
        }
    }

    /// Same configuration with a different backoff cap.
    #[must_use]
    pub fn with_max_backoff_ms(self, max_backoff_ms: u64) -> Self {
        Self {
            max_backoff_ms,
            ..self
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
