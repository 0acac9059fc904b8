//! Resubmit failed fetches with a linearly growing delay.

use std::{future::Future, time::Duration};

use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;

/// Default growth of the delay between two consecutive retries.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1_500);

/// How often and how patiently a fetch is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_retry: u32,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Policy with the default backoff step.
    pub const fn new(base_delay: Duration, max_retry: u32) -> Self {
        Self {
            base_delay,
            max_retry,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    /// Delay waited before the `retry`-th retry (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        self.base_delay + self.backoff_step * retry
    }
}

/// Permanent failure once the retry budget is exhausted.
#[derive(Debug, Error)]
#[error("request failed after {retries} retries")]
pub struct RetryError<E> {
    /// Number of retries performed after the initial attempt.
    pub retries: u32,
    /// Error returned by the last attempt.
    #[source]
    pub source: E,
}

/// Run `operation` until it succeeds or `policy.max_retry` retries have failed.
///
/// Each call owns its own retry chain; the operation is re-invoked from scratch
/// for every attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if retry < policy.max_retry => {
                retry += 1;
                let delay = policy.delay_before(retry);
                debug!(retry, delay_ms = delay.as_millis() as u64, error = %err, "retrying request");
                sleep(delay).await;
            }
            Err(err) => {
                return Err(RetryError {
                    retries: policy.max_retry,
                    source: err,
                });
            }
        }
    }
}
