//! Retry policy for remote calls.

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::remote::RemoteResult;

/// How often, and how patiently, a remote call is attempted.
///
/// Only [retryable](crate::remote::RemoteError::is_retryable) failures are
/// repeated. The default makes a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy making at most `max_attempts` attempts, pausing
    /// `backoff` between them.
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff_ms: u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the attempt budget.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the pause between attempts.
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    /// Runs `call` until it succeeds, fails permanently, or the attempt
    /// budget is spent. The last error is returned.
    ///
    /// # Errors
    ///
    /// Returns the final [`crate::remote::RemoteError`] produced by `call`.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> RemoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let mut attempt: u32 = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && err.is_retryable() => {
                    tracing::debug!(operation, attempt, error = %err, "retrying remote call");
                    tokio::time::sleep(self.backoff()).await;
                    attempt = attempt.saturating_add(1);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
