//! Configuration layer for the command-line front end.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - `--config`, or the per-user file from [`defaults::config_path`]
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! Headers are merged: TOML headers first, then CLI headers replace any
//! with the same name.
//!
//! # CLI-Only vs TOML-Only Options
//!
//! Some retry policy options are TOML-only (not available via CLI):
//! - `retry.max_delay` (default: 30s) - Maximum retry delay
//! - `retry.jitter` (default: 0.0) - Random spread applied to each delay
//!
//! # Secrets
//!
//! The API token and webhook secret may come from either source. Neither
//! is ever printed: `Display` reports only whether each is set.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::{BaseUrlProblem, ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
