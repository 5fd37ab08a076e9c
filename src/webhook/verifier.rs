//! Authentication and parsing of inbound webhook deliveries.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::time::{Clock, SystemClock};

use super::signature::{compute_signature, timing_safe_eq};
use super::{EventKind, WebhookEvent, WebhookSignatureError};

/// Header carrying the hex HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-fam-signature";

/// Verification settings, fixed for the lifetime of a [`Webhooks`] instance.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Signing key; `None` disables signature verification entirely.
    pub secret: Option<String>,
    /// Maximum allowed skew between an event timestamp and now; `None` disables the check.
    pub tolerance: Option<Duration>,
}

impl WebhookConfig {
    /// Default replay window (5 minutes).
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

    /// Creates a config that verifies with `secret` and the default tolerance.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            tolerance: Some(Self::DEFAULT_TOLERANCE),
        }
    }

    /// Creates a config that skips verification.
    #[must_use]
    pub const fn unverified() -> Self {
        Self {
            secret: None,
            tolerance: Some(Self::DEFAULT_TOLERANCE),
        }
    }

    /// Sets the replay window; `None` disables the timestamp check.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Option<Duration>) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self::unverified()
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

/// A delivery body, either raw or already decoded by the caller's framework.
#[derive(Debug, Clone, Copy)]
pub enum WebhookPayload<'a> {
    /// Nothing was delivered.
    Missing,
    /// The raw JSON text.
    Raw(&'a str),
    /// A decoded JSON value; only objects are accepted.
    Decoded(&'a Value),
    /// A decoded JSON object.
    Map(&'a Map<String, Value>),
}

impl<'a> From<&'a str> for WebhookPayload<'a> {
    fn from(raw: &'a str) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a String> for WebhookPayload<'a> {
    fn from(raw: &'a String) -> Self {
        Self::Raw(raw)
    }
}

impl<'a> From<&'a Value> for WebhookPayload<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Decoded(value)
    }
}

impl<'a> From<&'a Map<String, Value>> for WebhookPayload<'a> {
    fn from(map: &'a Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl<'a, T: Into<Self>> From<Option<T>> for WebhookPayload<'a> {
    fn from(payload: Option<T>) -> Self {
        payload.map_or(Self::Missing, Into::into)
    }
}

/// Wire envelope of a delivery.
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    event_type: String,
    resource_id: String,
    id: String,
    date: i64,
    #[serde(default)]
    custom_data: Option<String>,
}

/// Verifies and parses webhook deliveries.
///
/// Holds only immutable configuration, so one instance can be shared by
/// any number of concurrent requests.
///
/// # Type Parameters
///
/// - `C`: The clock used for the replay window (defaults to [`SystemClock`])
///
/// # Example
///
/// ```
/// use mangopay_fam::webhook::{WebhookConfig, Webhooks, compute_signature};
///
/// let webhooks = Webhooks::new(WebhookConfig::new("whsec_test"));
/// let payload = r#"{"EventType":"PAYIN_NORMAL_FAILED","ResourceId":"pay_456","Id":"evt_789","Date":1704067200}"#;
/// let signature = compute_signature("whsec_test", payload.as_bytes());
///
/// let event = webhooks.construct_event(payload, Some(&signature)).unwrap();
/// assert_eq!(event.resource_id, "pay_456");
/// ```
#[derive(Debug, Clone)]
pub struct Webhooks<C = SystemClock> {
    config: WebhookConfig,
    clock: C,
}

impl Webhooks<SystemClock> {
    /// Creates a verifier using the system clock.
    #[must_use]
    pub const fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C> Webhooks<C> {
    /// Sets a custom clock for the replay window.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Webhooks<C2> {
        Webhooks {
            config: self.config,
            clock,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Computes the signature a sender would attach to `payload`.
    ///
    /// Returns `None` when no secret is configured.
    #[must_use]
    pub fn sign(&self, payload: &str) -> Option<String> {
        self.config
            .secret
            .as_deref()
            .map(|secret| compute_signature(secret, payload.as_bytes()))
    }

    /// Checks `signature` against the HMAC-SHA256 of the raw `payload`.
    ///
    /// Always true when no secret is configured. A missing or empty
    /// signature fails when one is.
    #[must_use]
    pub fn verify(&self, payload: &str, signature: Option<&str>) -> bool {
        let Some(secret) = self.config.secret.as_deref() else {
            return true;
        };
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            return false;
        };

        let expected = compute_signature(secret, payload.as_bytes());
        timing_safe_eq(&expected, signature)
    }

    /// Parses a delivery into a typed event without checking its signature.
    ///
    /// Useful for logging payloads that must not be trusted yet.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookSignatureError`] if the payload is missing or empty,
    /// is not valid JSON, is not an object, lacks a required field, or names
    /// an unknown event type.
    pub fn parse<'a>(
        &self,
        payload: impl Into<WebhookPayload<'a>>,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        parse_event(payload.into())
    }

    /// Verifies then parses a delivery.
    ///
    /// This is the entry point for payloads received over the network.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookSignatureError`] if the signature does not match,
    /// or for any reason listed on [`parse`](Self::parse).
    pub fn construct_event(
        &self,
        payload: &str,
        signature: Option<&str>,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        if !self.verify(payload, signature) {
            tracing::warn!("Webhook rejected: signature mismatch");
            return Err(WebhookSignatureError::new("signature verification failed"));
        }
        parse_event(WebhookPayload::Raw(payload))
    }

    /// Verifies, reading the signature from [`SIGNATURE_HEADER`], then parses.
    ///
    /// # Errors
    ///
    /// As [`construct_event`](Self::construct_event).
    pub fn construct_event_from_headers(
        &self,
        payload: &str,
        headers: &http::HeaderMap,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        self.construct_event(payload, signature)
    }
}

impl<C: Clock> Webhooks<C> {
    /// Like [`verify`](Self::verify), and additionally requires `timestamp`
    /// (Unix seconds) to be within the configured tolerance of now.
    #[must_use]
    pub fn verify_with_timestamp(&self, payload: &str, signature: Option<&str>, timestamp: i64) -> bool {
        if !self.verify(payload, signature) {
            return false;
        }
        self.within_tolerance(timestamp)
    }

    /// Verifies signature and timestamp, then parses.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookSignatureError`] if the signature does not match,
    /// the timestamp is outside the tolerance, or parsing fails.
    pub fn construct_event_with_timestamp(
        &self,
        payload: &str,
        signature: Option<&str>,
        timestamp: i64,
    ) -> Result<WebhookEvent, WebhookSignatureError> {
        if !self.verify(payload, signature) {
            tracing::warn!("Webhook rejected: signature mismatch");
            return Err(WebhookSignatureError::new("signature verification failed"));
        }
        if !self.within_tolerance(timestamp) {
            tracing::warn!(timestamp, "Webhook rejected: timestamp outside tolerance");
            return Err(WebhookSignatureError::new(
                "timestamp outside the tolerance window",
            ));
        }
        parse_event(WebhookPayload::Raw(payload))
    }

    fn within_tolerance(&self, timestamp: i64) -> bool {
        let Some(tolerance) = self.config.tolerance else {
            return true;
        };
        let skew = self.clock.unix_seconds().abs_diff(timestamp);
        skew <= tolerance.as_secs()
    }
}

fn parse_event(payload: WebhookPayload<'_>) -> Result<WebhookEvent, WebhookSignatureError> {
    let map = match payload {
        WebhookPayload::Missing | WebhookPayload::Decoded(Value::Null) => {
            return Err(WebhookSignatureError::new("payload is empty"));
        }
        WebhookPayload::Raw(raw) if raw.trim().is_empty() => {
            return Err(WebhookSignatureError::new("payload is empty"));
        }
        WebhookPayload::Raw(raw) => {
            let value: Value = serde_json::from_str(raw).map_err(|e| {
                WebhookSignatureError::new(format!("payload is not valid JSON: {e}"))
            })?;
            return parse_event(WebhookPayload::Decoded(&value));
        }
        WebhookPayload::Map(map) => map,
        WebhookPayload::Decoded(value) => value
            .as_object()
            .ok_or_else(|| WebhookSignatureError::new("payload is not a JSON object"))?,
    };
    if map.is_empty() {
        return Err(WebhookSignatureError::new("payload is empty"));
    }

    let envelope = Envelope::deserialize(&Value::Object(map.clone())).map_err(|e| {
        WebhookSignatureError::new(format!("payload has an invalid shape: {e}"))
    })?;

    let kind = EventKind::from_wire(&envelope.event_type).ok_or_else(|| {
        WebhookSignatureError::new(format!("unknown event type '{}'", envelope.event_type))
    })?;

    Ok(WebhookEvent {
        id: envelope.id,
        date: envelope.date,
        resource_id: envelope.resource_id,
        custom_data: envelope.custom_data,
        kind,
    })
}
