//! Time abstraction for testability.
//!
//! This module provides a [`Clock`] trait for reading wall-clock time and a
//! [`Sleeper`] trait for suspending between retry attempts. Production code
//! uses [`SystemClock`] and [`TokioSleeper`]; tests inject controlled values.

use std::time::{Duration, SystemTime};

/// Abstraction over system time for testability.
///
/// Implementations provide the current time, allowing tests to inject
/// controlled time values instead of relying on actual system time.
///
/// # Example
///
/// ```
/// use mangopay_fam::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;

    /// Returns the current time as Unix seconds.
    ///
    /// Times before the epoch are reported as negative seconds.
    fn unix_seconds(&self) -> i64 {
        match self.now().duration_since(SystemTime::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
        }
    }
}

/// Production clock using actual system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock frozen at a fixed instant.
///
/// Useful when replaying a captured webhook delivery against its original
/// receive time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub SystemTime);

impl FixedClock {
    /// Creates a clock frozen at the given Unix second.
    #[must_use]
    pub fn at_unix(secs: u64) -> Self {
        Self(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

/// Abstraction over asynchronous sleeping.
///
/// The retry loop suspends through this trait so tests can skip real delays
/// and record the backoff schedule.
pub trait Sleeper: Send + Sync {
    /// Suspends the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Intended for tests; in production it turns backoff into a tight loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
