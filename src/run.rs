//! Command execution.
//!
//! Each subcommand other than `init` runs here once configuration has been
//! loaded and validated.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use mangopay_fam::api::{ApiClient, ApiError, ApiRequest};
use mangopay_fam::config::{Command, ConfigError, ValidatedConfig, field};
use mangopay_fam::time::{Clock, Sleeper};
use mangopay_fam::transport::{HttpClient, ReqwestClient};
use mangopay_fam::webhook::{WebhookEvent, WebhookSignatureError, Webhooks};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Marker path for reading the payload from stdin.
const STDIN_MARKER: &str = "-";

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A command needs a setting that was not configured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read the payload.
    #[error("Failed to read payload '{}': {source}", path.display())]
    PayloadRead {
        /// Payload path, `-` for stdin
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The webhook delivery was rejected.
    #[error(transparent)]
    Rejected(#[from] WebhookSignatureError),

    /// The API call failed.
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    /// A `--query` argument is not `key=value`.
    #[error("Invalid query parameter '{0}': expected 'key=value'")]
    InvalidQuery(String),

    /// Failed to encode output.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Executes a subcommand.
///
/// # Errors
///
/// Returns an error if the command fails; see [`RunError`].
///
/// # Coverage Note
///
/// Excluded from coverage: reads stdin, talks to the network and listens
/// for Ctrl+C. The pieces it composes are tested individually.
#[cfg(not(tarpaulin_include))]
pub async fn execute(command: Command, config: ValidatedConfig) -> Result<(), RunError> {
    match command {
        // Handled before configuration is loaded
        Command::Init { .. } => Ok(()),

        Command::Sign { payload } => {
            let payload = read_payload(&payload).await?;
            let signature = sign(&Webhooks::new(config.webhook), &payload)?;
            println!("{signature}");
            Ok(())
        }

        Command::Verify {
            payload,
            signature,
            timestamp,
            check_event_date,
        } => {
            let payload = read_payload(&payload).await?;
            let webhooks = Webhooks::new(config.webhook);
            let window = if check_event_date {
                Window::EventDate
            } else {
                timestamp.map_or(Window::SignatureOnly, Window::Timestamp)
            };

            let event = verify(&webhooks, &payload, &signature, window)?;
            tracing::info!(id = %event.id, kind = %event.kind, "Webhook accepted");
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }

        Command::Get { path, query } => {
            let client = ApiClient::new(ReqwestClient::new(), config.client);
            let cancel = CancellationToken::new();
            let _guard = spawn_ctrl_c_handler(cancel.clone());

            if let Some(body) = get(&client, &path, &query, &cancel).await? {
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            Ok(())
        }
    }
}

/// Which timestamp, if any, the replay window is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Signature only.
    SignatureOnly,
    /// An out-of-band delivery timestamp.
    Timestamp(i64),
    /// The event's own `Date` field.
    EventDate,
}

/// Computes the signature for `payload`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingRequired`] when no webhook secret is configured.
pub fn sign<C>(webhooks: &Webhooks<C>, payload: &str) -> Result<String, RunError> {
    webhooks.sign(payload).ok_or_else(|| {
        RunError::Config(ConfigError::missing(
            field::WEBHOOK_SECRET,
            "Use --webhook-secret or set webhook.secret in config file",
        ))
    })
}

/// Verifies and parses a delivery.
///
/// # Errors
///
/// Returns [`RunError::Rejected`] for any verification or parse failure.
pub fn verify<C: Clock>(
    webhooks: &Webhooks<C>,
    payload: &str,
    signature: &str,
    window: Window,
) -> Result<WebhookEvent, RunError> {
    if webhooks.config().secret.is_none() {
        tracing::warn!("No webhook secret configured; signature not checked");
    }

    let event = match window {
        Window::SignatureOnly => webhooks.construct_event(payload, Some(signature))?,
        Window::Timestamp(ts) => {
            webhooks.construct_event_with_timestamp(payload, Some(signature), ts)?
        }
        Window::EventDate => {
            // Date is read from the untrusted payload, then covered by the signature check
            let date = webhooks.parse(payload)?.date;
            webhooks.construct_event_with_timestamp(payload, Some(signature), date)?
        }
    };

    Ok(event)
}

/// Issues a GET request and returns the decoded body, if any.
///
/// # Errors
///
/// Returns [`RunError::InvalidQuery`] for a malformed `--query`, or
/// [`RunError::Api`] when the request fails.
pub async fn get<H, S>(
    client: &ApiClient<H, S>,
    path: &str,
    query: &[String],
    cancel: &CancellationToken,
) -> Result<Option<Value>, RunError>
where
    H: HttpClient,
    S: Sleeper + Clone,
{
    let mut request = ApiRequest::get(path);
    for pair in query {
        let (key, value) = parse_query(pair)?;
        request = request.with_query(key, value);
    }

    tracing::debug!(path, "Sending GET request");
    let response = client.send_cancellable(request, cancel).await?;
    tracing::info!(status = %response.status, "Request succeeded");

    Ok(response.body)
}

fn parse_query(pair: &str) -> Result<(&str, &str), RunError> {
    pair.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim(), value.trim()))
        .ok_or_else(|| RunError::InvalidQuery(pair.to_string()))
}

/// Reads a payload from a file, or from stdin when `path` is `-`.
///
/// The content is returned exactly as read, since signatures cover the raw bytes.
async fn read_payload(path: &Path) -> Result<String, RunError> {
    let read_error = |source: std::io::Error| RunError::PayloadRead {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == STDIN_MARKER {
        let mut payload = String::new();
        tokio::io::stdin()
            .read_to_string(&mut payload)
            .await
            .map_err(read_error)?;
        return Ok(payload);
    }

    tokio::fs::read_to_string(path).await.map_err(read_error)
}

/// Cancels `token` on Ctrl+C. The returned guard stops listening when dropped.
#[cfg(not(tarpaulin_include))]
fn spawn_ctrl_c_handler(token: CancellationToken) -> tokio_util::sync::DropGuard {
    let guard = token.clone().drop_guard();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::info!("Received shutdown signal, cancelling request");
                    token.cancel();
                }
            }
            () = token.cancelled() => {}
        }
    });
    guard
}
