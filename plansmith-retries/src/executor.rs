//! The retry executor.

use std::future::Future;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{BackoffPolicy, Retryable};

/// Execute an operation, retrying transient failures per the policy.
///
/// Non-retryable errors are returned immediately. Retryable errors are
/// retried until the policy declines, with the policy's delay (or the
/// server's `Retry-After` hint) between attempts.
pub async fn with_retry<P, F, Fut, T, E>(policy: &P, operation: F) -> Result<T, E>
where
    P: BackoffPolicy,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !error.is_retryable() {
                    return Err(error);
                }
                let Some(wait) = policy.next_delay(attempt, error.retry_after()) else {
                    warn!(attempt, error = %error, "retries exhausted");
                    return Err(error);
                };
                debug!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %error,
                    "transient failure, waiting before retry"
                );
                sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::{ExponentialBackoff, FixedDelay};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("transient")]
        Transient,
        #[error("fatal")]
        Fatal,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Transient)
        }
    }

    fn fast_policy(max_retries: u32) -> FixedDelay {
        FixedDelay::new(Duration::from_millis(1), max_retries)
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = with_retry(&fast_policy(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, TestError> = with_retry(&fast_policy(3), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(TestError::Transient)
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fatal_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = with_retry(&fast_policy(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Fatal)
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let calls = AtomicU32::new(0);
        let policy = ExponentialBackoff::builder()
            .max_retries(2)
            .initial_delay(Duration::from_millis(1))
            .jitter(0.0)
            .build();

        let result: Result<(), TestError> = with_retry(&policy, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Transient)
        })
        .await;

        assert!(result.is_err());
        // Initial attempt plus two retries.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
