//! Wire-level request and response values, and the transport seam.

use std::time::Duration;

use super::HttpError;

/// A fully resolved outbound request.
///
/// [`ApiClient`](crate::api::ApiClient) produces one per attempt after URL
/// resolution, header merging and JSON encoding, so a transport only moves
/// bytes.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    /// Absolute URL including the query string
    pub url: url::Url,
    /// Merged headers; a name may carry several values
    pub headers: http::HeaderMap,
    /// Encoded JSON body
    pub body: Option<Vec<u8>>,
    /// Upper bound for the whole exchange, if any
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Starts a request with no headers, body or timeout.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Attaches an encoded body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header value, keeping earlier values for the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Whatever the server answered, buffered in full.
///
/// Error statuses are still responses here; mapping them to
/// [`ApiError`](crate::api::ApiError) happens one layer up.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: http::StatusCode,
    pub headers: http::HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the first value of `name` as a string, if present and visible ASCII.
    #[must_use]
    pub fn header_str(&self, name: impl http::header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one [`HttpRequest`] and hands back the raw [`HttpResponse`].
///
/// [`ReqwestClient`](super::ReqwestClient) is the production implementation;
/// tests plug in scripted clients to drive the retry and error paths.
///
/// ```ignore
/// use mangopay_fam::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct Scripted(HttpResponse);
///
/// impl HttpClient for Scripted {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Performs the exchange. Any status code counts as success at this layer.
    ///
    /// # Errors
    ///
    /// - [`HttpError::Connection`] when no response arrives
    /// - [`HttpError::Timeout`] when `req.timeout` elapses
    /// - [`HttpError::InvalidRequest`] when the request cannot be built
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}
