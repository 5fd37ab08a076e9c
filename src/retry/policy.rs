//! Retry policy configuration.

use std::time::Duration;

use rand::Rng;

/// Configuration for exponential backoff retry behavior.
///
/// Controls how many times to attempt an operation and how long to wait
/// between attempts. The delay doubles after every retry and is capped at
/// `max_delay`.
///
/// # Defaults
///
/// - `max_attempts`: 3
/// - `base_delay`: 1 second
/// - `max_delay`: 30 seconds
/// - `jitter`: 0.0 (disabled)
///
/// # Example
///
/// ```
/// use mangopay_fam::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_attempts(5)
///     .with_base_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(10));
///
/// assert_eq!(policy.delay_for_retry(0), Duration::from_millis(200));
/// assert_eq!(policy.delay_for_retry(1), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    ///
    /// A value of 1 means no retries; only the initial attempt is made.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Ceiling for backoff growth.
    pub max_delay: Duration,

    /// Relative jitter applied to each delay, in `0.0..=1.0`.
    ///
    /// `0.2` spreads each delay uniformly over ±20%.
    pub jitter: f64,
}

impl RetryPolicy {
    /// Default maximum attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Default base delay (1 second).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Minimum value for `max_attempts`.
    pub const MIN_MAX_ATTEMPTS: u32 = 1;

    /// Creates a new retry policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            jitter: 0.0,
        }
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is less than 1.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(
            max_attempts >= Self::MIN_MAX_ATTEMPTS,
            "max_attempts must be at least 1"
        );
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    ///
    /// Zero delay is supported but turns the retry loop into a tight loop.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the relative jitter.
    ///
    /// # Panics
    ///
    /// Panics if `jitter` is outside `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&jitter),
            "jitter must be between 0.0 and 1.0"
        );
        self.jitter = jitter;
        self
    }

    /// Computes the delay for a given retry number (0-indexed), without jitter.
    ///
    /// `delay(0) = base_delay`, `delay(n + 1) = min(delay(n) * 2, max_delay)`.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }

    /// Computes the delay for a retry with jitter applied, still capped at `max_delay`.
    #[must_use]
    pub fn jittered_delay_for_retry(&self, retry: u32) -> Duration {
        let delay = self.delay_for_retry(retry);
        // Fields are public, so the range checked by `with_jitter` may not hold here
        if self.jitter.is_nan() || self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }

        let jitter = self.jitter.min(1.0);
        let factor = rand::rng().random_range((1.0 - jitter)..=(1.0 + jitter));
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Returns true if another attempt is allowed after `attempt` attempts were made.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
