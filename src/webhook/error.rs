//! Error type for webhook verification and parsing.

use thiserror::Error;

/// A webhook delivery was rejected.
///
/// Covers bad or missing signatures, stale timestamps and malformed
/// payloads alike; the only sensible reaction is to reject the delivery.
/// The message says which check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Webhook rejected: {message}")]
pub struct WebhookSignatureError {
    message: String,
}

impl WebhookSignatureError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message describing the failed check.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
