//! Inbound webhook verification and parsing.
//!
//! This module provides:
//! - Signature computation and timing-safe comparison ([`compute_signature`], [`timing_safe_eq`])
//! - The event model ([`WebhookEvent`], [`EventKind`], [`ProviderEventType`], [`PlatformEventType`])
//! - The verifier ([`Webhooks`]) and its settings ([`WebhookConfig`])
//!
//! Every rejection is a [`WebhookSignatureError`]. Signatures are computed
//! over the raw body as received; re-serializing a parsed body before
//! verification breaks them.

mod error;
mod event;
mod signature;
mod verifier;


pub use error::WebhookSignatureError;
pub use event::{EventKind, PlatformEventType, ProviderEventType, WebhookEvent};
pub use signature::{compute_signature, timing_safe_eq};
pub use verifier::{SIGNATURE_HEADER, WebhookConfig, WebhookPayload, Webhooks};
