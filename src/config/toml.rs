//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// API client configuration section
    #[serde(default)]
    pub api: ApiSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Webhook verification configuration
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// API client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Base URL
    pub base_url: Option<String>,

    /// Bearer token for Authorization header
    pub token: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout: Option<u64>,

    /// HTTP headers as key-value pairs
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of attempts
    pub max_attempts: Option<u32>,

    /// Base retry delay in seconds
    pub base_delay: Option<u64>,

    /// Maximum retry delay in seconds
    pub max_delay: Option<u64>,

    /// Random spread applied to each delay, 0.0 to 1.0
    pub jitter: Option<f64>,
}

/// Webhook verification configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Signing secret
    pub secret: Option<String>,

    /// Timestamp tolerance in seconds; 0 disables the check
    pub tolerance: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Mangopay FAM Configuration File

[api]
# API base URL (default: sandbox)
# Production: "https://api.mangopay.com"
base_url = "https://api.sandbox.mangopay.com"

# Bearer token for Authorization header
# token = "your-token-here"

# Per-attempt request timeout in seconds (default: 30)
# timeout = 30

# Extra HTTP headers sent with every request
# [api.headers]
# X-Custom-Header = "value"

[retry]
# Maximum number of attempts, including the first (default: 3)
# max_attempts = 3

# Base retry delay in seconds, doubled after each retry (default: 1)
# base_delay = 1

# Maximum retry delay in seconds (default: 30)
# max_delay = 30

# Random spread applied to each delay, 0.0 to 1.0 (default: 0.0)
# jitter = 0.0

[webhook]
# Signing secret; when absent, signatures are not checked
# secret = "whsec_..."

# Maximum skew between a delivery timestamp and now, in seconds (default: 300)
# 0 disables the check
# tolerance = 300
"#
    .to_string()
}
