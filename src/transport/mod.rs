//! HTTP transport layer.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//!
//! The transport knows nothing about the remote API: it sends bytes and
//! reports connection-level failures distinctly from returned responses.

mod client;
mod error;
mod message;

#[cfg(test)]
mod message_tests;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse};
