//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;

use crate::api::SANDBOX_BASE_URL;

/// Default API base URL.
pub const BASE_URL: &str = SANDBOX_BASE_URL;

/// Default per-attempt request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default maximum number of attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default base retry delay in seconds.
pub const RETRY_BASE_DELAY_SECS: u64 = 1;

/// Default maximum retry delay in seconds.
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

/// Default jitter fraction.
pub const RETRY_JITTER: f64 = 0.0;

/// Default webhook timestamp tolerance in seconds.
pub const WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Output file for `init` when `--output` is not given.
pub const INIT_OUTPUT: &str = "mangopay-fam.toml";

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "mangopay-fam";

/// Path of the per-user config file, if the platform has a config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
