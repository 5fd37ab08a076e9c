//! Mangopay FAM client core
//!
//! Verification and parsing of inbound webhook deliveries, and a resilient
//! executor for outbound API calls that classifies failures and retries
//! transient ones with exponential backoff.

pub mod api;
pub mod config;
pub mod retry;
pub mod time;
pub mod transport;
pub mod webhook;
