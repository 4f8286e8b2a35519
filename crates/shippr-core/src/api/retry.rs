//! Retry with fixed backoff

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::ApiResult;
use crate::config::RetryConfig;

/// How many times to attempt a call and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delays: Vec<Duration>,
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts and the given delays.
    ///
    /// `delays[i]` is waited after failed attempt `i + 1`; the last delay is
    /// reused when there are more attempts than delays.
    pub fn new(max_attempts: u32, delays: Vec<Duration>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delays,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Vec::new())
    }

    /// Total attempts allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the failed attempt numbered `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let index = (attempt.saturating_sub(1) as usize).min(self.delays.len().saturating_sub(1));
        self.delays.get(index).copied().unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.delays_ms.iter().copied().map(Duration::from_millis).collect(),
        )
    }
}

/// Outcome of [`with_retry`] together with the number of attempts made.
#[derive(Debug)]
pub struct Attempted<T> {
    /// Final result.
    pub result: ApiResult<T>,
    /// Attempts made, at least 1.
    pub attempts: u32,
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, procedure: &str, mut op: F) -> Attempted<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => {
                return Attempted {
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(err) if !err.is_retryable() => {
                debug!(procedure, attempt, code = %err.kind, "Not retrying");
                return Attempted {
                    result: Err(err),
                    attempts: attempt,
                };
            }
            Err(err) if attempt >= policy.max_attempts() => {
                return Attempted {
                    result: Err(err),
                    attempts: attempt,
                };
            }
            Err(err) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    procedure,
                    attempt,
                    code = %err.kind,
                    error = %err.message,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying"
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
        }
    }
}
