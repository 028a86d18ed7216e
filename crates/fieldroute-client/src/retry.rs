//! Fixed-delay retry for transient server failures.
//!
//! Only [`ApiError::Status`] with a 5xx status is retried. Client errors,
//! timeouts and unreachable servers are returned on the first failure. Attempts
//! for one logical call run strictly one after another.

use std::future::Future;
use std::time::Duration;

use fieldroute_core::AppConfig;

use crate::error::ApiError;

/// Attempt budget and pause between attempts. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Returns `true` for errors worth another attempt: HTTP 5xx responses only.
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    err.is_server_error()
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// the policy's attempt budget is spent. The last error is returned.
pub(crate) async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                err.log();
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = policy.delay.as_millis() as u64;
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "server error, retrying after fixed delay"
                );
            }
        }

        tokio::time::sleep(policy.delay).await;
        attempt += 1;
    }
}
