//! Error taxonomy for remote API calls.
//!
//! Every failure of a request is one [`ApiError`] variant. Status-derived
//! variants are produced only by [`ApiError::from_status`], which is total
//! over all status codes.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::retry::{Cancelled, ShouldRetry};
use crate::transport::HttpError;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Context decoded from an error response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    /// Human-readable message (`message`, then `error`, then the reason phrase).
    pub message: String,
    /// Machine-readable error code, if the server sent one.
    pub code: Option<String>,
    /// Free-form details, passed through untouched.
    pub details: Option<Value>,
}

impl ErrorBody {
    /// Creates a body carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Sets the error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the details payload.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Error type for API requests.
///
/// Callers match on the variant: field errors come with
/// [`ApiError::Validation`], throttling hints with [`ApiError::RateLimited`],
/// and every status without a dedicated kind falls into [`ApiError::Status`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 or 422: the request was rejected as malformed.
    #[error("Validation failed ({status}): {}", body.message)]
    Validation {
        /// Either 400 or 422
        status: u16,
        /// Decoded error body
        body: ErrorBody,
        /// Per-field messages
        errors: FieldErrors,
    },

    /// 401: missing or invalid credentials.
    #[error("Authentication failed: {}", .0.message)]
    Authentication(ErrorBody),

    /// 403: credentials lack permission.
    #[error("Not authorized: {}", .0.message)]
    Authorization(ErrorBody),

    /// 404: the resource does not exist.
    #[error("Not found: {}", .0.message)]
    NotFound(ErrorBody),

    /// 429: too many requests.
    #[error("Rate limited: {}", body.message)]
    RateLimited {
        /// Decoded error body
        body: ErrorBody,
        /// Server-requested wait from the `Retry-After` header
        retry_after: Option<Duration>,
    },

    /// Any other non-success status.
    #[error("API error ({status}): {}", body.message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Decoded error body
        body: ErrorBody,
    },

    /// Transport-level failure (DNS, connection refused or reset).
    #[error("Network error: {message}")]
    Network {
        /// Description of the failure
        message: String,
        /// Underlying transport error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The attempt exceeded its timeout. A network error refinement.
    #[error("Request timed out after {}ms", duration.as_millis())]
    Timeout {
        /// The timeout that was exceeded
        duration: Duration,
    },

    /// A success response could not be decoded into the requested type.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled the request.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Maps a non-success status to its error kind.
    ///
    /// The status alone selects the variant: 400/422 are validation errors,
    /// 401, 403, 404 and 429 have dedicated kinds, everything else is
    /// [`ApiError::Status`]. `errors` is only kept for validation errors and
    /// `retry_after` only for rate limiting.
    #[must_use]
    pub fn from_status(
        status: u16,
        body: ErrorBody,
        errors: FieldErrors,
        retry_after: Option<Duration>,
    ) -> Self {
        match status {
            400 | 422 => Self::Validation {
                status,
                body,
                errors,
            },
            401 => Self::Authentication(body),
            403 => Self::Authorization(body),
            404 => Self::NotFound(body),
            429 => Self::RateLimited { body, retry_after },
            _ => Self::Status { status, body },
        }
    }

    /// Creates a network error without an underlying source.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Returns the HTTP status for status-derived errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            Self::Authorization(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Returns the decoded error body for status-derived errors.
    #[must_use]
    pub const fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Validation { body, .. }
            | Self::RateLimited { body, .. }
            | Self::Status { body, .. }
            | Self::Authentication(body)
            | Self::Authorization(body)
            | Self::NotFound(body) => Some(body),
            _ => None,
        }
    }

    /// Returns the per-field messages of a validation error.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Returns the server-requested wait of a rate-limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns true for transport failures, timeouts included.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Returns true if the failure is presumed transient.
    ///
    /// Network errors, timeouts, 429 and 5xx are transient; other 4xx,
    /// decode failures, malformed requests and cancellation are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Converts a transport failure, reporting `timeout` for timeouts whose
    /// duration the transport did not know.
    #[must_use]
    pub fn from_transport(error: HttpError, timeout: Duration) -> Self {
        match error {
            HttpError::Timeout(duration) => Self::Timeout {
                duration: duration.unwrap_or(timeout),
            },
            HttpError::InvalidRequest(reason) => Self::InvalidRequest(reason),
            HttpError::Connection(source) => Self::Network {
                message: source.to_string(),
                source: Some(source),
            },
        }
    }
}

impl From<Cancelled> for ApiError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Default retry predicate for API requests.
///
/// Retries transient failures (see [`ApiError::is_retryable`]) and honours
/// the `Retry-After` hint of rate-limit responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryOnTransient;

impl ShouldRetry<ApiError> for RetryOnTransient {
    fn should_retry(&self, error: &ApiError) -> bool {
        error.is_retryable()
    }

    fn retry_after(&self, error: &ApiError) -> Option<Duration> {
        error.retry_after()
    }
}

/// Decodes an error response into its [`ErrorBody`] and field errors.
///
/// Lowercase keys (`message`, `error`, `code`, `details`, `errors`) are
/// preferred; the provider's capitalised keys (`Message`, `Type`, `Errors`)
/// are accepted as fallbacks. A non-object body becomes the message itself.
pub(crate) fn decode_error_body(body: Option<&Value>, reason: &str) -> (ErrorBody, FieldErrors) {
    let Some(body) = body else {
        return (ErrorBody::new(reason), FieldErrors::new());
    };
    let Value::Object(map) = body else {
        let message = match body {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            _ => reason.to_string(),
        };
        return (ErrorBody::new(message), FieldErrors::new());
    };

    let text = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string)
    };

    let error_body = ErrorBody {
        message: text(&["message", "error", "Message"]).unwrap_or_else(|| reason.to_string()),
        code: text(&["code", "Type"]),
        details: map.get("details").filter(|v| !v.is_null()).cloned(),
    };
    let errors = map
        .get("errors")
        .or_else(|| map.get("Errors"))
        .map(field_errors)
        .unwrap_or_default();

    (error_body, errors)
}

/// Normalises `{ field: "msg" | ["msg", ...] }` into [`FieldErrors`].
fn field_errors(value: &Value) -> FieldErrors {
    let Value::Object(map) = value else {
        return FieldErrors::new();
    };

    map.iter()
        .filter_map(|(field, messages)| {
            let messages: Vec<String> = match messages {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => return None,
            };
            Some((field.clone(), messages))
        })
        .collect()
}

/// Parses a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value?.trim().parse::<u64>().ok().map(Duration::from_secs)
}
