//! Retry executor — exponential backoff for transient backend failures.
//!
//! Only [`GenerateError::is_transient`] kinds (rate limiting) are retried;
//! auth, validation, and server faults surface immediately. This is the only
//! place in the service that introduces intentional delay.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout_at, Instant};
use tracing::warn;

use crate::llm_client::GenerateError;

/// Backoff policy. Delay after the 0-indexed attempt `i` is
/// `base_delay * 2^i`, so the defaults yield 1 s, 2 s between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Invokes `operation` up to `policy.max_attempts` times.
///
/// A `deadline` bounds the whole sequence: each attempt runs under
/// `timeout_at`, and a backoff sleep that would overshoot the deadline
/// aborts the remaining attempts with [`GenerateError::DeadlineExceeded`].
/// When every attempt fails transiently, the last observed error is
/// propagated.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    mut operation: F,
) -> Result<T, GenerateError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GenerateError>>,
{
    let mut last_error: Option<GenerateError> = None;

    for attempt in 0..policy.max_attempts.max(1) {
        if attempt > 0 {
            let delay = policy.base_delay * 2u32.pow(attempt - 1);
            if let Some(deadline) = deadline {
                if Instant::now() + delay >= deadline {
                    return Err(GenerateError::DeadlineExceeded);
                }
            }
            warn!(
                "backend call attempt {}/{} failed transiently, retrying after {}ms",
                attempt,
                policy.max_attempts,
                delay.as_millis()
            );
            sleep(delay).await;
        }

        let result = match deadline {
            Some(deadline) => match timeout_at(deadline, operation()).await {
                Ok(result) => result,
                Err(_) => return Err(GenerateError::DeadlineExceeded),
            },
            None => operation().await,
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => last_error = Some(err),
            Err(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        GenerateError::RateLimited(format!(
            "retries exhausted after {} attempts",
            policy.max_attempts
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_failure(
        calls: Arc<AtomicU32>,
        err: fn() -> GenerateError,
    ) -> impl FnMut() -> std::future::Ready<Result<String, GenerateError>> {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err(err()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_retries_exactly_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result: Result<String, _> = with_retry(
            &policy,
            None,
            counting_failure(calls.clone(), || {
                GenerateError::RateLimited("slow down".into())
            }),
        )
        .await;

        assert!(matches!(result, Err(GenerateError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Backoff 1000ms + 2000ms = base * (2^0 + 2^1).
        assert_eq!(start.elapsed().as_millis(), 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_error_fails_after_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let result: Result<String, _> = with_retry(
            &policy,
            None,
            counting_failure(calls.clone(), || GenerateError::Auth("bad key".into())),
        )
        .await;

        assert!(matches!(result, Err(GenerateError::Auth(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed().as_millis(), 0, "no delay before fail-fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let counter = calls.clone();
        let result = with_retry(&policy, None, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if n < 2 {
                Err(GenerateError::RateLimited("slow down".into()))
            } else {
                Ok("letter".to_string())
            })
        })
        .await;

        assert_eq!(result.unwrap(), "letter");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();

        let result: Result<String, _> = with_retry(
            &policy,
            None,
            counting_failure(calls.clone(), || GenerateError::Upstream("500".into())),
        )
        .await;

        assert!(matches!(result, Err(GenerateError::Upstream(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_remaining_backoff() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::default();
        // Enough for the first backoff (1000ms) but not the second (2000ms).
        let deadline = Instant::now() + Duration::from_millis(1500);

        let result: Result<String, _> = with_retry(
            &policy,
            Some(deadline),
            counting_failure(calls.clone(), || {
                GenerateError::RateLimited("slow down".into())
            }),
        )
        .await;

        assert!(matches!(result, Err(GenerateError::DeadlineExceeded)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_aborts_hung_attempt() {
        let policy = RetryPolicy::default();
        let deadline = Instant::now() + Duration::from_millis(500);

        let result: Result<String, _> = with_retry(&policy, Some(deadline), || {
            std::future::pending::<Result<String, GenerateError>>()
        })
        .await;

        assert!(matches!(result, Err(GenerateError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy_attempt_count() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
        };
        let start = Instant::now();

        let result: Result<String, _> = with_retry(
            &policy,
            None,
            counting_failure(calls.clone(), || {
                GenerateError::RateLimited("slow down".into())
            }),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        // 10 + 20 + 40 + 80 = 150ms total backoff.
        assert_eq!(start.elapsed().as_millis(), 150);
    }
}
