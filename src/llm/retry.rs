//! Generic retry wrapper with exponential backoff and jitter.

use std::{fmt::Display, future::Future, time::Duration};

use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

/// Default number of invocations before the last error propagates.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Shortest delay the backoff will ever produce.
const MIN_DELAY: Duration = Duration::from_millis(100);
/// Relative jitter applied to each delay, uniformly in `±JITTER_RATIO`.
const JITTER_RATIO: f64 = 0.3;

/// Closed set of provider failures worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    /// The provider rejected the call because of request-rate limits.
    RateLimited,
    /// The provider reported itself at capacity.
    Overloaded,
    /// The call timed out in flight or on the provider side.
    TimedOut,
}

/// Invoke `operation`, retrying failures that `classify` marks as transient.
///
/// The delay before the retry following 0-indexed attempt `n` is `2^(n+1)`
/// seconds, jittered by up to ±30% and floored at 100 ms. Fatal failures and
/// the final exhausted attempt's error propagate unchanged; this wrapper
/// never transforms the underlying error.
pub async fn call_with_retry<T, E, F, Fut, C>(
    mut operation: F,
    max_attempts: u32,
    classify: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Option<TransientKind>,
    E: Display,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let Some(kind) = classify(&err) else {
                    return Err(err);
                };

                if attempt + 1 >= max_attempts {
                    warn!(error = %err, attempts = max_attempts, "retries exhausted");
                    return Err(err);
                }

                let delay = backoff_delay(attempt);
                warn!(
                    error = %err,
                    kind = ?kind,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient failure; backing off before retry"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Compute the jittered backoff delay for a 0-indexed attempt number.
fn backoff_delay(attempt: u32) -> Duration {
    let base = 2f64.powi(attempt as i32 + 1);
    let jitter = rand::rng().random_range(-JITTER_RATIO..=JITTER_RATIO);
    Duration::from_secs_f64(base * (1.0 + jitter)).max(MIN_DELAY)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct FakeError {
        message: &'static str,
        transient: Option<TransientKind>,
    }

    fn rate_limited() -> FakeError {
        FakeError {
            message: "rate limited",
            transient: Some(TransientKind::RateLimited),
        }
    }

    fn fatal() -> FakeError {
        FakeError {
            message: "invalid api key",
            transient: None,
        }
    }

    fn classify(err: &FakeError) -> Option<TransientKind> {
        err.transient
    }

    #[tokio::test(start_paused = true)]
    async fn two_transient_failures_then_success_makes_three_calls() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = call_with_retry(
            move || {
                let calls = counter.clone();
                async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err(rate_limited()),
                        n => Ok(n + 1),
                    }
                }
            },
            DEFAULT_MAX_ATTEMPTS,
            classify,
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_failures_propagate_without_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = call_with_retry(
            move || {
                let calls = counter.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(fatal())
                }
            },
            DEFAULT_MAX_ATTEMPTS,
            classify,
        )
        .await;

        assert_eq!(result.unwrap_err().message, "invalid api key");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_propagate_the_last_error_unchanged() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<(), _> = call_with_retry(
            move || {
                let calls = counter.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(rate_limited())
                }
            },
            3,
            classify,
        )
        .await;

        assert_eq!(result.unwrap_err().message, "rate limited");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backoff_delays_stay_within_the_jitter_envelope() {
        for attempt in 0..4 {
            let base = 2f64.powi(attempt as i32 + 1);
            for _ in 0..64 {
                let delay = backoff_delay(attempt).as_secs_f64();
                assert!(delay >= base * (1.0 - JITTER_RATIO) - 1e-9);
                assert!(delay <= base * (1.0 + JITTER_RATIO) + 1e-9);
                assert!(delay >= MIN_DELAY.as_secs_f64());
            }
        }
    }
}
