//! Retry loop for one logical operation.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::time::{Sleeper, TokioSleeper};

use super::RetryPolicy;

/// Decides whether a failed attempt should be retried.
///
/// Closures of type `Fn(&E) -> bool` implement this trait, so ad-hoc
/// predicates can be passed directly.
pub trait ShouldRetry<E> {
    /// Returns true if the error is worth another attempt.
    fn should_retry(&self, error: &E) -> bool;

    /// Server-requested delay before the next attempt, if any.
    ///
    /// When present and larger than the computed backoff, it is used instead.
    fn retry_after(&self, _error: &E) -> Option<Duration> {
        None
    }
}

impl<E, F> ShouldRetry<E> for F
where
    F: Fn(&E) -> bool,
{
    fn should_retry(&self, error: &E) -> bool {
        self(error)
    }
}

/// Predicate that retries every error until attempts are exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E> ShouldRetry<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// Marker error produced when a cancellation token fires mid-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Runs an operation with bounded retries and exponential backoff.
///
/// Holds no mutable state: every call to [`execute`](Self::execute) keeps its
/// own attempt counter, so one executor can serve concurrent callers.
///
/// # Type Parameters
///
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use mangopay_fam::retry::{AlwaysRetry, RetryExecutor, RetryPolicy};
/// use mangopay_fam::time::InstantSleeper;
///
/// # async fn example() {
/// let executor = RetryExecutor::new(RetryPolicy::new()).with_sleeper(InstantSleeper);
/// let value: Result<u32, &str> = executor.execute(|| async { Ok(7) }, &AlwaysRetry).await;
/// assert_eq!(value, Ok(7));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RetryExecutor<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl RetryExecutor<TokioSleeper> {
    /// Creates an executor that sleeps on the tokio timer.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl<S> RetryExecutor<S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryExecutor<S2> {
        RetryExecutor {
            policy: self.policy,
            sleeper,
        }
    }

    /// Returns a copy of this executor using a different policy.
    #[must_use]
    pub fn with_policy(&self, policy: RetryPolicy) -> Self
    where
        S: Clone,
    {
        Self {
            policy,
            sleeper: self.sleeper.clone(),
        }
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S: Sleeper> RetryExecutor<S> {
    /// Invokes `attempt` until it succeeds, the predicate rejects the error,
    /// or `max_attempts` is reached.
    ///
    /// # Errors
    ///
    /// Returns the most recent error unchanged when it is not retryable or
    /// when attempts are exhausted.
    pub async fn execute<T, E, F, Fut, P>(&self, attempt: F, predicate: &P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: ShouldRetry<E>,
    {
        self.run(attempt, predicate, std::future::pending()).await
    }

    /// Like [`execute`](Self::execute), but stops early when `cancel` fires.
    ///
    /// Cancellation is observed both while an attempt is in flight and while
    /// sleeping between attempts; the in-flight attempt future is dropped.
    ///
    /// # Errors
    ///
    /// Returns `E::from(Cancelled)` on cancellation, otherwise as
    /// [`execute`](Self::execute).
    pub async fn execute_cancellable<T, E, F, Fut, P>(
        &self,
        attempt: F,
        predicate: &P,
        cancel: &CancellationToken,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: ShouldRetry<E>,
        E: From<Cancelled>,
    {
        let cancelled = async move {
            cancel.cancelled().await;
            E::from(Cancelled)
        };
        self.run(attempt, predicate, cancelled).await
    }

    /// The retry loop. `cancel` resolves to the error to return when the
    /// caller gives up; it is never polled to completion more than once.
    async fn run<T, E, F, Fut, P, C>(
        &self,
        mut attempt: F,
        predicate: &P,
        cancel: C,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: ShouldRetry<E>,
        C: Future<Output = E>,
    {
        tokio::pin!(cancel);
        let mut attempts_made: u32 = 0;

        loop {
            attempts_made += 1;
            tracing::debug!(attempt = attempts_made, "Executing attempt");

            let outcome = tokio::select! {
                biased;
                cancelled = &mut cancel => return Err(cancelled),
                outcome = attempt() => outcome,
            };
            let error = match outcome {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !self.policy.should_retry(attempts_made) {
                tracing::debug!(attempts = attempts_made, "Retry attempts exhausted");
                return Err(error);
            }
            if !predicate.should_retry(&error) {
                tracing::debug!(attempt = attempts_made, "Error is not retryable");
                return Err(error);
            }

            let delay = self.next_delay(attempts_made - 1, predicate.retry_after(&error));
            tracing::warn!(
                attempt = attempts_made,
                max_attempts = self.policy.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Attempt failed, retrying"
            );

            tokio::select! {
                biased;
                cancelled = &mut cancel => return Err(cancelled),
                () = self.sleeper.sleep(delay) => {}
            }
        }
    }

    /// Backoff for the given retry, replaced by the server hint when that is longer.
    fn next_delay(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let backoff = self.policy.jittered_delay_for_retry(retry);
        hint.filter(|h| *h > backoff).unwrap_or(backoff)
    }
}
