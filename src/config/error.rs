//! Reasons a configuration is rejected before any command runs.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between reading `mangopay-fam.toml` plus the
/// command line and handing a [`ValidatedConfig`](super::ValidatedConfig) to a
/// command.
///
/// I/O and TOML failures come first; the rest name the setting at fault so
/// the message can be acted on without reading the source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `init` could not write the template.
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command needs a setting that neither the CLI nor the file provides.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// One of the [`field`] constants
        field: &'static str,
        /// How to supply it
        hint: &'static str,
    },

    /// `api.base_url` cannot serve as the prefix for request paths.
    #[error("Unusable base URL '{url}': {problem}")]
    BaseUrl {
        url: String,
        #[source]
        problem: BaseUrlProblem,
    },

    /// `api.timeout` is zero.
    #[error("Request timeout must be at least 1 second")]
    ZeroTimeout,

    /// `retry.max_attempts` is below the one attempt every request makes.
    #[error("retry.max_attempts must be at least {min}, got {value}")]
    TooFewAttempts { value: u32, min: u32 },

    /// `retry.max_delay` is below `retry.base_delay`.
    #[error(
        "retry.max_delay ({max_delay_secs}s) is shorter than retry.base_delay ({base_delay_secs}s)"
    )]
    DelayOrder {
        base_delay_secs: u64,
        max_delay_secs: u64,
    },

    /// `retry.jitter` is outside `0.0..=1.0`, or NaN.
    #[error("retry.jitter must be within 0.0..=1.0, got {value}")]
    JitterOutOfRange { value: f64 },

    /// A `--header` argument has neither `=` nor `:`.
    #[error("Invalid header format '{value}': expected 'Key=Value' or 'Key: Value'")]
    HeaderSyntax { value: String },

    #[error("Invalid header name '{name}': {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    #[error("Invalid header value for '{name}': {source}")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

/// What makes a base URL unusable.
#[derive(Debug, Error)]
pub enum BaseUrlProblem {
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    #[error("scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    /// Query parameters go on individual requests.
    #[error("it carries a query string")]
    Query,

    #[error("it carries a fragment")]
    Fragment,
}

/// Field names reported by [`ConfigError::MissingRequired`].
pub mod field {
    pub const WEBHOOK_SECRET: &str = "webhook_secret";
}

impl ConfigError {
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
