//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::api::ClientOptions;
use crate::retry::RetryPolicy;
use crate::webhook::WebhookConfig;

use super::cli::Cli;
use super::defaults;
use super::error::{BaseUrlProblem, ConfigError};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Options for the API client
    pub client: ClientOptions,

    /// Webhook verification settings
    pub webhook: WebhookConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tolerance = self
            .webhook
            .tolerance
            .map_or_else(|| "off".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ base_url: {}, token: {}, timeout: {}s, headers: {}, \
             retry: {}x/{}s..{}s, webhook_secret: {}, tolerance: {} }}",
            self.client.base_url,
            if self.client.token.is_some() { "set" } else { "none" },
            self.client.timeout.as_secs(),
            self.client.headers.len(),
            self.client.retry.max_attempts,
            self.client.retry.base_delay.as_secs(),
            self.client.retry.max_delay.as_secs(),
            if self.webhook.secret.is_some() { "set" } else { "none" },
            tolerance,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL does not parse, is not http(s), or carries a query or fragment
    /// - The timeout is zero
    /// - Header format, name or value is invalid
    /// - Retry settings are out of range
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let base_url = Self::resolve_base_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let headers = Self::resolve_headers(cli, toml)?;
        let retry = Self::build_retry_policy(cli, toml)?;

        let token = cli
            .token
            .clone()
            .or_else(|| toml.and_then(|t| t.api.token.clone()));

        let mut client = ClientOptions::new(base_url)
            .with_timeout(timeout)
            .with_headers(headers)
            .with_retry_policy(retry);
        if let Some(token) = token {
            client = client.with_token(token);
        }

        Ok(Self {
            client,
            webhook: Self::build_webhook_config(cli, toml),
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path. Otherwise
    /// the per-user config file is used when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli
            .config
            .clone()
            .or_else(|| defaults::config_path().filter(|p| p.is_file()));

        let toml = match path {
            Some(ref path) => Some(TomlConfig::load(path)?),
            None => None,
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.api.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let unusable = |problem| ConfigError::BaseUrl {
            url: url_str.to_string(),
            problem,
        };

        let url = Url::parse(url_str).map_err(|e| unusable(BaseUrlProblem::Parse(e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(unusable(BaseUrlProblem::UnsupportedScheme(
                url.scheme().to_string(),
            )));
        }
        if url.query().is_some() {
            return Err(unusable(BaseUrlProblem::Query));
        }
        if url.fragment().is_some() {
            return Err(unusable(BaseUrlProblem::Fragment));
        }

        Ok(url)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.api.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();

        // TOML first so CLI can override
        if let Some(toml) = toml {
            for (name, value) in &toml.api.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Priority: CLI explicit > TOML > default
        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let base_delay_secs = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.base_delay))
            .unwrap_or(defaults::RETRY_BASE_DELAY_SECS);

        let max_delay_secs = retry
            .and_then(|r| r.max_delay)
            .unwrap_or(defaults::RETRY_MAX_DELAY_SECS);

        let jitter = retry
            .and_then(|r| r.jitter)
            .unwrap_or(defaults::RETRY_JITTER);

        if max_attempts < RetryPolicy::MIN_MAX_ATTEMPTS {
            return Err(ConfigError::TooFewAttempts {
                value: max_attempts,
                min: RetryPolicy::MIN_MAX_ATTEMPTS,
            });
        }

        if max_delay_secs < base_delay_secs {
            return Err(ConfigError::DelayOrder {
                base_delay_secs,
                max_delay_secs,
            });
        }

        if !(0.0..=1.0).contains(&jitter) {
            return Err(ConfigError::JitterOutOfRange { value: jitter });
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_base_delay(Duration::from_secs(base_delay_secs))
            .with_max_delay(Duration::from_secs(max_delay_secs))
            .with_jitter(jitter))
    }

    fn build_webhook_config(cli: &Cli, toml: Option<&TomlConfig>) -> WebhookConfig {
        let section = toml.map(|t| &t.webhook);

        let secret = cli
            .webhook_secret
            .clone()
            .or_else(|| section.and_then(|w| w.secret.clone()));

        let tolerance_secs = cli
            .tolerance
            .or_else(|| section.and_then(|w| w.tolerance))
            .unwrap_or(defaults::WEBHOOK_TOLERANCE_SECS);

        let tolerance = (tolerance_secs > 0).then(|| Duration::from_secs(tolerance_secs));

        WebhookConfig { secret, tolerance }
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::HeaderSyntax {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|source| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            source,
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|source| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        source,
    })
}
