//! Full-jitter exponential backoff.
//!
//! Before retry `attempt` the delay is drawn uniformly from
//! `[0, min(cap, base * 2^attempt)]`. Spreading delays over the whole window
//! keeps concurrent fetchers from retrying against the store in lockstep.

use std::time::Duration;

use crate::config::FetchConfig;

/// Upper bound of the jitter window for `attempt`.
#[must_use]
pub fn max_wait_ms(attempt: u32, base_ms: u64, cap_ms: u64) -> u64 {
    let exp = base_ms.saturating_mul(2_u64.saturating_pow(attempt));
    exp.min(cap_ms)
}

/// Random delay in `[0, min(cap_ms, 100 * 2^attempt)]` milliseconds.
#[must_use]
pub fn full_jitter_ms(attempt: u32, cap_ms: u64) -> u64 {
    jitter(max_wait_ms(attempt, crate::config::DEFAULT_BASE_DELAY_MS, cap_ms))
}

/// Random delay for `attempt` under `config`.
#[must_use]
pub fn delay_for(attempt: u32, config: &FetchConfig) -> Duration {
    Duration::from_millis(jitter(max_wait_ms(
        attempt,
        config.base_delay_ms,
        config.max_backoff_ms,
    )))
}

fn jitter(max_wait: u64) -> u64 {
    rand::random_range(0..=max_wait)
}

/// Sleep for a full-jitter delay before retry `attempt`.
pub async fn backoff(attempt: u32, config: &FetchConfig) -> Duration {
    let delay = delay_for(attempt, config);
    tokio::time::sleep(delay).await;
    delay
}
