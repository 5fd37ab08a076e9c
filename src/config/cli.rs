//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Mangopay FAM client
///
/// Signs and verifies webhook deliveries and issues API calls with
/// retry and backoff.
#[derive(Debug, Parser)]
#[command(name = "mangopay-fam")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Bearer token for the Authorization header
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Per-attempt request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V", global = true)]
    pub headers: Vec<String>,

    /// Maximum number of attempts
    #[arg(long = "retry-max", global = true)]
    pub retry_max: Option<u32>,

    /// Base retry delay in seconds
    #[arg(long = "retry-delay", global = true)]
    pub retry_delay: Option<u64>,

    /// Webhook signing secret
    #[arg(long = "webhook-secret", global = true)]
    pub webhook_secret: Option<String>,

    /// Webhook timestamp tolerance in seconds (0 disables the check)
    #[arg(long, global = true)]
    pub tolerance: Option<u64>,
}

/// Subcommands for mangopay-fam
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::INIT_OUTPUT)]
        output: PathBuf,
    },

    /// Print the signature a sender would attach to a payload
    Sign {
        /// Payload file, or '-' for stdin
        payload: PathBuf,
    },

    /// Verify a delivery and print the parsed event as JSON
    #[command(group(ArgGroup::new("window").args(["timestamp", "check_event_date"])))]
    Verify {
        /// Payload file, or '-' for stdin
        payload: PathBuf,

        /// Signature received with the delivery
        #[arg(long, short)]
        signature: String,

        /// Delivery timestamp (Unix seconds) to check against the tolerance
        #[arg(long)]
        timestamp: Option<i64>,

        /// Check the event's own Date field against the tolerance
        #[arg(long = "check-event-date")]
        check_event_date: bool,
    },

    /// Issue a GET request with retry and print the JSON body
    Get {
        /// Path relative to the base URL
        path: String,

        /// Query parameters in 'key=value' format (can be specified multiple times)
        #[arg(long = "query", short, value_name = "K=V")]
        query: Vec<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
