//! Resilient request execution against the remote API.
//!
//! This module provides:
//! - The error taxonomy ([`ApiError`]) and its status mapping ([`ApiError::from_status`])
//! - The default retry predicate ([`RetryOnTransient`])
//! - Client configuration ([`ClientOptions`])
//! - Request/response values ([`ApiRequest`], [`ApiResponse`])
//! - The client itself ([`ApiClient`])
//!
//! Resource-specific modules (users, wallets, pay-ins, ...) build
//! [`ApiRequest`]s and hand them to [`ApiClient`].

mod client;
mod error;
mod options;
mod request;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod request_tests;

pub use client::ApiClient;
pub use error::{ApiError, ErrorBody, FieldErrors, RetryOnTransient};
pub use options::{ClientOptions, PRODUCTION_BASE_URL, SANDBOX_BASE_URL};
pub use request::{ApiRequest, ApiResponse};
