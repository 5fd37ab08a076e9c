//! Production HTTP client implementation using reqwest.

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait. Connection pooling is shared between clones.
///
/// # Example
///
/// ```no_run
/// use mangopay_fam::transport::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.sandbox.mangopay.com/v2.01/")?;
/// let response = client.request(HttpRequest::new(http::Method::GET, url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let timeout = req.timeout;
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                HttpError::Timeout(timeout)
            } else if e.is_builder() {
                HttpError::InvalidRequest(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        };

        let response = builder.send().await.map_err(classify)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify)?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
