//! Bounded retries with exponential backoff.
//!
//! - [`RetryPolicy`] holds the backoff parameters.
//! - [`ShouldRetry`] decides, per classified error, whether another attempt
//!   is worthwhile and whether the server asked for a specific delay.
//! - [`RetryExecutor`] runs one logical operation under a policy.

mod executor;
mod policy;


pub use executor::{AlwaysRetry, Cancelled, RetryExecutor, ShouldRetry};
pub use policy::RetryPolicy;
