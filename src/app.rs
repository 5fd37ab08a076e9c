//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use mangopay_fam::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    use crate::run::RunError;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing required fields, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Numeric value of [`runtime_error`].
    pub const RUNTIME_ERROR_CODE: u8 = 2;

    /// Webhook rejected (exit code 3) - bad signature, stale timestamp, malformed payload.
    pub const WEBHOOK_REJECTED_CODE: u8 = 3;

    /// Runtime error (exit code 2) - network failure, API error, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(RUNTIME_ERROR_CODE)
    }

    /// Numeric exit code for a command failure.
    pub const fn code_for(error: &RunError) -> u8 {
        match error {
            RunError::Config(_) => 1,
            RunError::Rejected(_) => WEBHOOK_REJECTED_CODE,
            RunError::PayloadRead { .. }
            | RunError::Api(_)
            | RunError::InvalidQuery(_)
            | RunError::Encode(_) => RUNTIME_ERROR_CODE,
        }
    }

    /// Exit code for a command failure.
    pub fn for_error(error: &RunError) -> ExitCode {
        ExitCode::from(code_for(error))
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::WEBHOOK_SECRET => {
            eprintln!("\nRun 'mangopay-fam init' to generate a configuration template.");
        }
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'mangopay-fam init' to generate a configuration template.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
