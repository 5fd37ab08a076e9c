//! Request and response values exchanged with [`ApiClient`](super::ApiClient).

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::retry::RetryPolicy;

use super::ApiError;

/// One logical API call, before URL resolution and header merging.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL
    pub path: String,
    /// Query parameters; `None` and empty values are omitted from the URL
    pub query: Vec<(String, Option<String>)>,
    /// Caller headers, overriding client headers on collision
    pub headers: HeaderMap,
    /// JSON body
    pub body: Option<Value>,
    /// Per-attempt timeout override
    pub timeout: Option<Duration>,
    /// Retry policy override
    pub retry: Option<RetryPolicy>,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            retry: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), Some(value.into())));
        self
    }

    /// Adds a query parameter that is omitted when `None`.
    #[must_use]
    pub fn with_optional_query(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.query.push((key.into(), value));
        self
    }

    /// Sets a header, replacing any previous value for the same name.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `body` cannot be represented as JSON.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(self.with_body(value))
    }

    /// Overrides the client's per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the client's retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body: `None` when empty, a JSON string when not valid JSON
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Returns true when the server sent no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    /// Deserializes the body, treating an empty body as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.unwrap_or(Value::Null)).map_err(ApiError::Decode)
    }
}

/// Decodes a raw body: empty is `None`, invalid JSON falls back to a string.
pub(crate) fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(serde_json::from_slice(bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(bytes).into_owned())
    }))
}
