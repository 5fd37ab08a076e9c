//! Client-level options shared by every request.

use std::fmt;
use std::time::Duration;

use http::HeaderMap;
use url::Url;

use crate::retry::RetryPolicy;

/// Base URL of the provider's sandbox environment.
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.mangopay.com";

/// Base URL of the provider's production environment.
pub const PRODUCTION_BASE_URL: &str = "https://api.mangopay.com";

/// Options applied to every request issued by an [`ApiClient`].
///
/// Immutable once handed to a client; use
/// [`ApiClient::with_token`] to derive a client with a rotated token.
///
/// [`ApiClient`]: super::ApiClient
/// [`ApiClient::with_token`]: super::ApiClient::with_token
#[derive(Clone)]
pub struct ClientOptions {
    /// Scheme, host and optional path prefix for every request
    pub base_url: Url,
    /// Bearer token sent in the `Authorization` header
    pub token: Option<String>,
    /// Default per-attempt timeout
    pub timeout: Duration,
    /// Extra headers added to every request
    pub headers: HeaderMap,
    /// Default retry policy
    pub retry: RetryPolicy,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl ClientOptions {
    /// Default per-attempt timeout (30 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates options for the given base URL with default settings.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
            headers: HeaderMap::new(),
            retry: RetryPolicy::default(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the default per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the extra headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the default retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("retry", &self.retry)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
