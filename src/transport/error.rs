//! Error types for HTTP transport operations.

use std::time::Duration;

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// A response with a non-success status is NOT an error at this layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// connection resets and body read failures.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// Carries the timeout that was exceeded, when the request set one.
    #[error("Request timed out{}", .0.map(|d| format!(" after {}ms", d.as_millis())).unwrap_or_default())]
    Timeout(Option<Duration>),

    /// The request could not be built (bad URL, header, or body).
    ///
    /// This indicates a programming or configuration error rather than
    /// a transient failure.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
