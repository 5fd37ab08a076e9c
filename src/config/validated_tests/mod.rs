//! Tests for validated configuration.

use std::time::Duration;

use super::{BaseUrlProblem, ConfigError};
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice, followed by a `get` command
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["mangopay-fam"];
    full_args.extend(args);
    full_args.extend(["get", "/users"]);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}
