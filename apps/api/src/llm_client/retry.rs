//! Bounded-retry combinator with pluggable backoff and a retryability
//! predicate, so "which failures are worth another attempt" is a policy
//! decision made by the caller rather than buried in the transport loop.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Backoff schedule: `2^k` seconds before attempt `k` (0-indexed).
/// No delay is ever applied before attempt 0.
pub fn exponential_secs(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Runs `op` up to `max_attempts` times.
///
/// A failure the predicate marks as non-retryable is returned immediately,
/// consuming no further attempts. Otherwise the combinator sleeps for
/// `backoff(k)` before attempt `k` and retries; after the final failed
/// attempt the most recent error is returned. Waits are non-blocking
/// (`tokio::time::sleep`), so paused-clock tests can drive the schedule.
pub async fn retry_with_backoff<T, E, Op, Fut>(
    max_attempts: u32,
    backoff: impl Fn(u32) -> Duration,
    is_retryable: impl Fn(&E) -> bool,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if !is_retryable(&e) || attempt >= max_attempts {
                    return Err(e);
                }
                let delay = backoff(attempt);
                warn!(
                    "attempt {}/{} failed ({e}), retrying after {}s",
                    attempt,
                    max_attempts,
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
