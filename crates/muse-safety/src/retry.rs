//! Bounded retry with randomized exponential backoff for remote calls.
//!
//! Used uniformly by the text and image clients so transient 429/5xx
//! responses do not immediately fall through to the fail-open/fail-closed
//! default. Terminal failures (4xx other than 429, malformed bodies)
//! return immediately.

use std::future::Future;
use std::time::Duration;

use muse_core::{Error, Result};
use rand::Rng;
use tracing::{debug, warn};

/// Backoff multiplier range applied between attempts.
const BACKOFF_FACTOR_MIN: f64 = 1.5;
const BACKOFF_FACTOR_MAX: f64 = 2.5;

/// Retry schedule for a remote call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, initial_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            initial_delay,
            max_delay: Duration::from_millis(muse_core::defaults::RETRY_MAX_DELAY_MS),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            muse_core::defaults::RETRY_ATTEMPTS,
            Duration::from_millis(muse_core::defaults::RETRY_INITIAL_DELAY_MS),
        )
    }
}

/// Run `op`, retrying while [`Error::is_retryable`] holds.
///
/// Each wait multiplies the previous delay by a random factor in
/// [1.5, 2.5], capped at `max_delay`. Returns the last error once
/// attempts are exhausted; the caller applies its own failure policy.
pub async fn retry<F, Fut, T>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 1..=policy.attempts {
        if attempt > 1 {
            debug!(op = operation, attempt, "retrying remote call");
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => {
                debug!(op = operation, attempt, error = %err, "terminal error, not retrying");
                return Err(err);
            }
            Err(err) if attempt == policy.attempts => {
                warn!(
                    op = operation,
                    attempt,
                    error = %err,
                    "remote call failed, attempts exhausted"
                );
                return Err(err);
            }
            Err(err) => {
                warn!(
                    op = operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "remote call failed, will retry after backoff"
                );
                tokio::time::sleep(delay).await;
                let factor = rand::thread_rng().gen_range(BACKOFF_FACTOR_MIN..BACKOFF_FACTOR_MAX);
                delay = delay.mul_f64(factor).min(policy.max_delay);
            }
        }
    }

    // attempts >= 1, so the loop always returns
    Err(Error::Internal(format!("retry loop for {operation} ended without attempts")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> Error {
        Error::UpstreamStatus {
            status: 503,
            message: "overloaded".to_string(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let policy = RetryPolicy::default();
        let result = retry(&policy, "test_op", || async { Ok::<_, Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_then_succeeds() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result = retry(&policy, "test_op", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(transient())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result: Result<()> = retry(&policy, "test_op", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(transient()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_fails_immediately() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result: Result<()> = retry(&policy, "test_op", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::UpstreamStatus {
                    status: 400,
                    message: "bad request".to_string(),
                })
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_rate_limit() {
        let attempts = AtomicU32::new(0);
        let policy = RetryPolicy::new(2, Duration::from_millis(10));

        let result = retry(&policy, "test_op", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Err(Error::UpstreamStatus {
                        status: 429,
                        message: "rate limited".to_string(),
                    })
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
    }

    #[test]
    fn test_policy_clamps_zero_attempts() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1));
        assert_eq!(policy.attempts, 1);
    }
}
