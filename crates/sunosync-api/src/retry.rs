//! The retrying operation shared by feed and media requests.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sunosync_core::{FetchError, FetchResult, RetrySettings};
use tracing::warn;

use crate::error::ApiError;

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    /// Finished; return the value.
    Done(T),
    /// Transient failure; back off and try again.
    Retry(ApiError),
    /// Terminal failure; stop without retrying.
    Fail(FetchError),
}

/// Run `op` until it finishes, fails terminally, or the retry budget runs out.
///
/// Between attempts it sleeps `min(max_backoff, base * 2^(n-1))` plus a
/// uniform jitter. A DNS-shaped first failure logs a hint but is retried
/// like any other transient error.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetrySettings,
    target: &str,
    mut op: F,
) -> FetchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let mut retry: u32 = 0;
    loop {
        let error = match op().await {
            Attempt::Done(value) => return Ok(value),
            Attempt::Fail(error) => return Err(error),
            Attempt::Retry(error) => error,
        };

        retry = retry.saturating_add(1);
        if !policy.allows_retry(retry) {
            return Err(FetchError::retry_exceeded(target, retry, error.to_string()));
        }

        if retry == 1 && error.is_dns() {
            warn!(
                target_name = %target,
                "DNS resolution failed; check network/VPN/DNS settings"
            );
        }

        let delay = policy.backoff(retry) + jitter(policy.jitter);
        warn!(
            target_name = %target,
            attempt = retry,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %error,
            "Retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..=max.as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use sunosync_core::RetryBudget;
    use std::io;

    fn policy(max_retries: u32) -> RetrySettings {
        RetrySettings {
            max_retries,
            budget: RetryBudget::Retries,
            base_delay: Duration::from_millis(100),
            max_backoff: Duration::from_secs(1),
            jitter: Duration::from_millis(10),
            timeout: Duration::from_secs(1),
        }
    }

    fn transient() -> ApiError {
        ApiError::Io(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = Cell::new(0);
        let result = run_with_retry(&policy(5), "page 0", || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Attempt::Retry(transient())
                } else {
                    Attempt::Done(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exceeded_reports_attempts() {
        let calls = Cell::new(0);
        let result: FetchResult<()> = run_with_retry(&policy(2), "page 4", || {
            calls.set(calls.get() + 1);
            async { Attempt::Retry(transient()) }
        })
        .await;

        match result {
            Err(FetchError::RetryExceeded {
                target,
                attempts,
                last_error,
            }) => {
                assert_eq!(target, "page 4");
                assert_eq!(attempts, 3);
                assert!(last_error.contains("reset"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_budget_includes_first_attempt() {
        let calls = Cell::new(0);
        let attempts = RetrySettings {
            budget: RetryBudget::Attempts,
            ..policy(2)
        };
        let result: FetchResult<()> = run_with_retry(&attempts, "clip abc", || {
            calls.set(calls.get() + 1);
            async { Attempt::Retry(transient()) }
        })
        .await;

        assert!(matches!(
            result,
            Err(FetchError::RetryExceeded { attempts: 2, .. })
        ));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_is_not_retried() {
        let calls = Cell::new(0);
        let result: FetchResult<()> = run_with_retry(&policy(0), "page 1", || {
            calls.set(calls.get() + 1);
            async { Attempt::Fail(FetchError::Auth { status: 401 }) }
        })
        .await;

        assert_eq!(result, Err(FetchError::Auth { status: 401 }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_are_bounded() {
        let start = tokio::time::Instant::now();
        let _: FetchResult<()> = run_with_retry(&policy(3), "page 2", || async {
            Attempt::Retry(transient())
        })
        .await;

        // 100ms + 200ms + 400ms of backoff plus at most 10ms jitter each.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(700));
        assert!(elapsed <= Duration::from_millis(731));
    }

    #[test]
    fn test_zero_jitter() {
        assert_eq!(jitter(Duration::ZERO), Duration::ZERO);
        assert!(jitter(Duration::from_millis(5)) <= Duration::from_millis(5));
    }
}
