//! Resilient client for the remote API.

use std::sync::Arc;
use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::retry::RetryExecutor;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};

use super::error::{decode_error_body, parse_retry_after};
use super::request::decode_body;
use super::{ApiError, ApiRequest, ApiResponse, ClientOptions, RetryOnTransient};

/// Client executing [`ApiRequest`]s with retries and typed errors.
///
/// Cloning is cheap: the transport and options are shared.
///
/// # Type Parameters
///
/// - `H`: The HTTP transport
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use mangopay_fam::api::{ApiClient, ApiRequest, ClientOptions};
/// use mangopay_fam::transport::ReqwestClient;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ClientOptions::new(Url::parse("https://api.sandbox.mangopay.com")?)
///     .with_token("access-token");
/// let client = ApiClient::new(ReqwestClient::new(), options);
///
/// let user: serde_json::Value = client
///     .request_json(ApiRequest::get("/v2.01/my-client/users/123"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ApiClient<H, S = TokioSleeper> {
    http: Arc<H>,
    options: Arc<ClientOptions>,
    executor: RetryExecutor<S>,
}

impl<H, S: Clone> Clone for ApiClient<H, S> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            options: Arc::clone(&self.options),
            executor: self.executor.clone(),
        }
    }
}

impl<H> ApiClient<H, TokioSleeper> {
    /// Creates a client over the given transport.
    #[must_use]
    pub fn new(http: H, options: ClientOptions) -> Self {
        let executor = RetryExecutor::new(options.retry.clone());
        Self {
            http: Arc::new(http),
            options: Arc::new(options),
            executor,
        }
    }
}

impl<H, S> ApiClient<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> ApiClient<H, S2> {
        ApiClient {
            http: self.http,
            options: self.options,
            executor: self.executor.with_sleeper(sleeper),
        }
    }

    /// Returns a new client handle authenticating with `token`.
    ///
    /// The transport is shared; `self` keeps its own token.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self
    where
        S: Clone,
    {
        let options = ClientOptions {
            token: Some(token.into()),
            ..(*self.options).clone()
        };
        Self {
            http: Arc::clone(&self.http),
            options: Arc::new(options),
            executor: self.executor.clone(),
        }
    }

    /// Returns the client options.
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the retry executor, for wrapping calls that bypass [`ApiRequest`].
    #[must_use]
    pub const fn executor(&self) -> &RetryExecutor<S> {
        &self.executor
    }

    /// Resolves `path` against the base URL and appends non-empty query values.
    ///
    /// The base path keeps its segments, `path` is appended after them, and any
    /// query already on the base stays ahead of the appended pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the base URL cannot carry a path.
    pub fn build_url(&self, path: &str, query: &[(String, Option<String>)]) -> Result<Url, ApiError> {
        let mut url = self.options.base_url.clone();
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL '{url}' cannot carry a path"
            )));
        }

        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_fragment(None);

        let mut present = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().filter(|v| !v.is_empty()).map(|v| (k, v)))
            .peekable();
        if present.peek().is_some() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    /// Merges standard, auth, client and request headers.
    ///
    /// A name set by a later layer replaces every value from earlier layers,
    /// while all of its own values are kept.
    fn build_headers(&self, request: &ApiRequest) -> Result<HeaderMap, ApiError> {
        let invalid = |e: http::header::InvalidHeaderValue| ApiError::InvalidRequest(e.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.options.user_agent).map_err(invalid)?,
        );
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(token) = &self.options.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(invalid)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        for layer in [&self.options.headers, &request.headers] {
            for name in layer.keys() {
                headers.remove(name);
                for value in layer.get_all(name) {
                    headers.append(name.clone(), value.clone());
                }
            }
        }

        Ok(headers)
    }

    /// Builds the transport request and resolves the effective timeout.
    fn prepare(&self, request: &ApiRequest) -> Result<(HttpRequest, Duration), ApiError> {
        let timeout = request.timeout.unwrap_or(self.options.timeout);
        let url = self.build_url(&request.path, &request.query)?;

        let mut http_request = self.build_headers(request)?.iter().fold(
            HttpRequest::new(request.method.clone(), url).with_timeout(timeout),
            |req, (name, value)| req.with_header(name.clone(), value.clone()),
        );
        if let Some(body) = &request.body {
            let bytes =
                serde_json::to_vec(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            http_request = http_request.with_body(bytes);
        }

        Ok((http_request, timeout))
    }
}

impl<H: HttpClient, S: Sleeper + Clone> ApiClient<H, S> {
    /// Sends the request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] of the last attempt when the failure is not
    /// retryable or attempts are exhausted.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (http_request, timeout) = self.prepare(&request)?;
        let executor = self.executor_for(&request);

        executor
            .execute(
                || self.attempt(&http_request, timeout),
                &RetryOnTransient,
            )
            .await
    }

    /// Like [`send`](Self::send), but gives up as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Cancelled`] on cancellation, otherwise as [`send`](Self::send).
    pub async fn send_cancellable(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse, ApiError> {
        let (http_request, timeout) = self.prepare(&request)?;
        let executor = self.executor_for(&request);

        executor
            .execute_cancellable(
                || self.attempt(&http_request, timeout),
                &RetryOnTransient,
                cancel,
            )
            .await
    }

    /// Sends the request and deserializes the response body.
    ///
    /// An empty body is decoded from JSON `null`, so `Option<T>` yields `None`.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus [`ApiError::Decode`] when the body does not match `T`.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    /// Sends a request whose success response carries no payload of interest.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send).
    pub async fn request_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    fn executor_for(&self, request: &ApiRequest) -> RetryExecutor<S> {
        request.retry.as_ref().map_or_else(
            || self.executor.clone(),
            |policy| self.executor.with_policy(policy.clone()),
        )
    }

    /// One attempt: send under the timeout and classify the outcome.
    async fn attempt(&self, request: &HttpRequest, timeout: Duration) -> Result<ApiResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = tokio::time::timeout(timeout, self.http.request(request.clone()))
            .await
            .map_err(|_| ApiError::Timeout { duration: timeout })?
            .map_err(|e| ApiError::from_transport(e, timeout))?;

        tracing::debug!(status = response.status.as_u16(), "Received response");
        into_result(response)
    }
}

/// Maps a transport response to success or its status-derived error.
fn into_result(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let body = decode_body(&response.body);

    if response.is_success() {
        return Ok(ApiResponse {
            status: response.status,
            headers: response.headers,
            body,
        });
    }

    let reason = response
        .status
        .canonical_reason()
        .unwrap_or("Unknown status");
    let (error_body, errors) = decode_error_body(body.as_ref(), reason);
    let retry_after = parse_retry_after(response.header_str(RETRY_AFTER));

    Err(ApiError::from_status(
        response.status.as_u16(),
        error_body,
        errors,
        retry_after,
    ))
}
