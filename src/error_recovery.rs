// src/error_recovery.rs
//! Retry with exponential backoff for remote operations.
//!
//! The error value decides whether another attempt is allowed; the policy
//! decides how many attempts there are and how long to wait between them.

use crate::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRY_AFTER,
};
use crate::error::{GenerationError, PublisherError};
use rand::Rng;
use std::fmt::Display;
use std::time::Duration;

/// What a failed attempt allows the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Surface the error now.
    Stop,
    /// Try again, optionally after a server-provided delay.
    Retry { after: Option<Duration> },
}

/// Errors that know whether repeating the operation is safe.
pub trait Retryable {
    fn retry_decision(&self) -> RetryDecision;
}

impl Retryable for PublisherError {
    fn retry_decision(&self) -> RetryDecision {
        if self.kind.is_retryable() {
            RetryDecision::Retry {
                after: self.retry_after,
            }
        } else {
            RetryDecision::Stop
        }
    }
}

impl Retryable for GenerationError {
    fn retry_decision(&self) -> RetryDecision {
        if self.is_retryable() {
            RetryDecision::Retry {
                after: self.retry_after(),
            }
        } else {
            RetryDecision::Stop
        }
    }
}

/// Bounded exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Retry-After hints above this are surfaced instead of waited out
    pub max_retry_after: Duration,
    /// Randomise each delay within its upper half
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_retry_after: DEFAULT_MAX_RETRY_AFTER,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that performs exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Same delays, different attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Un-jittered delay before retry number `retry` (1-based): the base
    /// delay doubled `retry - 1` times, capped at `max_delay`.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay to wait before retry number `retry`, or `None` when the server
    /// asked for a longer pause than the policy tolerates.
    pub fn delay_before_retry(&self, retry: u32, hint: Option<Duration>) -> Option<Duration> {
        match hint {
            Some(after) if after > self.max_retry_after => None,
            Some(after) => Some(after),
            None => Some(self.jittered(self.backoff_delay(retry))),
        }
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }
        let half = delay / 2;
        let spread = u64::try_from(half.as_millis()).unwrap_or(u64::MAX);
        half + Duration::from_millis(rand::rng().random_range(0..=spread))
    }
}

/// Retries an async operation with exponential backoff.
///
/// `operation` receives the 1-based attempt number. The loop ends on
/// success, on an error whose [`RetryDecision`] is `Stop`, when the attempt
/// budget is spent, or when a Retry-After hint exceeds the policy.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match operation(attempt).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let hint = match error.retry_decision() {
            RetryDecision::Stop => return Err(error),
            RetryDecision::Retry { after } => after,
        };

        if attempt >= max_attempts {
            log::warn!(
                "{}: giving up after {} attempt(s): {}",
                label,
                attempt,
                error
            );
            return Err(error);
        }

        let Some(delay) = policy.delay_before_retry(attempt, hint) else {
            log::warn!(
                "{}: server asked to wait {:?}, longer than the allowed {:?}",
                label,
                hint,
                policy.max_retry_after
            );
            return Err(error);
        };

        log::warn!(
            "{}: attempt {}/{} failed ({}), retrying after {:?}",
            label,
            attempt,
            max_attempts,
            error,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublisherErrorKind;
    use std::cell::Cell;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            max_retry_after: Duration::from_millis(50),
            jitter: false,
        }
    }

    fn transient() -> PublisherError {
        PublisherError::new(PublisherErrorKind::Transient, "503")
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            jitter: false,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(5));
        assert_eq!(policy.backoff_delay(200), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_upper_half() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(800),
            max_delay: Duration::from_secs(10),
            jitter: true,
            ..RetryPolicy::default()
        };
        for _ in 0..50 {
            let delay = policy.delay_before_retry(1, None).unwrap();
            assert!(delay >= Duration::from_millis(400));
            assert!(delay <= Duration::from_millis(800));
        }
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = fast_policy(3);
        assert_eq!(
            policy.delay_before_retry(1, Some(Duration::from_millis(20))),
            Some(Duration::from_millis(20))
        );
        assert_eq!(
            policy.delay_before_retry(1, Some(Duration::from_secs(3600))),
            None
        );
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Cell::new(0u32);
        let result: Result<&str, PublisherError> =
            retry_with_backoff(&fast_policy(3), "test", |attempt| {
                calls.set(calls.get() + 1);
                async move {
                    if attempt < 3 {
                        Err(transient())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_stops_when_attempts_are_exhausted() {
        let calls = Cell::new(0u32);
        let result: Result<(), PublisherError> =
            retry_with_backoff(&fast_policy(2), "test", |_| {
                calls.set(calls.get() + 1);
                async { Err(transient()) }
            })
            .await;

        assert_eq!(result.unwrap_err().kind, PublisherErrorKind::Transient);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        for kind in [
            PublisherErrorKind::Unauthorized,
            PublisherErrorKind::PermanentRejected,
            PublisherErrorKind::Unknown,
        ] {
            let calls = Cell::new(0u32);
            let result: Result<(), PublisherError> =
                retry_with_backoff(&fast_policy(5), "test", |_| {
                    calls.set(calls.get() + 1);
                    async move { Err(PublisherError::new(kind, "no")) }
                })
                .await;

            assert_eq!(result.unwrap_err().kind, kind);
            assert_eq!(calls.get(), 1, "{kind} must not be retried");
        }
    }

    #[tokio::test]
    async fn test_excessive_retry_after_is_surfaced() {
        let calls = Cell::new(0u32);
        let result: Result<(), PublisherError> =
            retry_with_backoff(&fast_policy(3), "test", |_| {
                calls.set(calls.get() + 1);
                async {
                    Err(PublisherError::new(PublisherErrorKind::RateLimited, "429")
                        .with_retry_after(Some(Duration::from_secs(600))))
                }
            })
            .await;

        assert_eq!(result.unwrap_err().kind, PublisherErrorKind::RateLimited);
        assert_eq!(calls.get(), 1);
    }
}
