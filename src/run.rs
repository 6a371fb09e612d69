//! Command execution.
//!
//! Runs one CLI command against the API and prints the result as JSON.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::pin;

use serde::Serialize;
use thiserror::Error;
use tokio::signal;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use stockalert::Client;
use stockalert::config::{
    AlertsCommand, Command, CreateAlertArgs, StocksCommand, ValidatedConfig, VerifyArgs,
    WatchlistCommand,
};
use stockalert::resources::{AlertParameters, CreateAlert, ListAlertsParams};
use stockalert::time::{Clock, Sleeper};
use stockalert::transport::HttpClient;
use stockalert::webhook::{self, WebhookEvent};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] stockalert::Error),

    /// The webhook payload file could not be read.
    #[error("Failed to read payload file '{}': {source}", path.display())]
    PayloadRead {
        /// Path to the payload file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The signature does not match the payload.
    #[error("Webhook signature does not match")]
    SignatureMismatch,

    /// The result could not be encoded.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// The result could not be written.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// The command does not talk to the API.
    #[error("'{0}' does not run against the API")]
    Offline(&'static str),
}

/// Executes an API command, cancelling it on Ctrl+C.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the call fails or is
/// cancelled, or the output cannot be written.
///
/// Excluded from coverage - requires signal handling and a live API.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Command) -> Result<(), RunError> {
    let token = CancellationToken::new();
    let client = Client::new(config.client)?.with_cancel_token(token.clone());

    let watcher = tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, cancelling...");
        token.cancel();
    });

    let result = run_command(&client, command, &mut std::io::stdout()).await;
    watcher.abort();
    result
}

/// Runs `command` with `client`, writing JSON to `out`.
///
/// # Errors
///
/// See [`execute`].
pub async fn run_command<H, S, C, W>(
    client: &Client<H, S, C>,
    command: Command,
    out: &mut W,
) -> Result<(), RunError>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
    W: Write,
{
    match command {
        Command::Alerts { command } => run_alerts(client, command, out).await,
        Command::Stocks {
            command: StocksCommand::Get { symbol },
        } => print_json(out, &client.stocks().get(&symbol).await?),
        Command::Stocks {
            command: StocksCommand::Search { query, limit },
        } => print_json(out, &client.stocks().search(&query, limit).await?),
        Command::Watchlist {
            command: WatchlistCommand::List,
        } => print_json(out, &client.watchlist().list().await?),
        Command::User => print_json(out, &client.user().profile().await?),
        Command::Init { .. } => Err(RunError::Offline("init")),
        Command::Verify(_) => Err(RunError::Offline("verify")),
    }
}

async fn run_alerts<H, S, C, W>(
    client: &Client<H, S, C>,
    command: AlertsCommand,
    out: &mut W,
) -> Result<(), RunError>
where
    H: HttpClient + 'static,
    S: Sleeper + 'static,
    C: Clock + 'static,
    W: Write,
{
    let alerts = client.alerts();

    match command {
        AlertsCommand::List {
            status,
            symbol,
            all,
            page,
            limit,
        } => {
            let params = ListAlertsParams {
                page,
                limit,
                status,
                symbol,
                ..ListAlertsParams::default()
            };

            if !all {
                return print_json(out, &alerts.list(&params).await?);
            }

            let mut stream = pin!(alerts.iter(&params)?);
            let mut collected = Vec::new();
            while let Some(alert) = stream.next().await {
                collected.push(alert?);
            }
            tracing::debug!(count = collected.len(), "Fetched all alerts");
            print_json(out, &collected)
        }
        AlertsCommand::Get { id } => print_json(out, &alerts.get(&id).await?),
        AlertsCommand::Create(args) => print_json(out, &alerts.create(&create_request(args)).await?),
        AlertsCommand::Delete { id } => {
            alerts.delete(&id).await?;
            tracing::info!("Deleted alert {id}");
            Ok(())
        }
        AlertsCommand::Pause { id } => print_json(out, &alerts.pause(&id).await?),
        AlertsCommand::Activate { id } => print_json(out, &alerts.activate(&id).await?),
    }
}

/// Converts `alerts create` arguments into a request.
fn create_request(args: CreateAlertArgs) -> CreateAlert {
    let mut request = CreateAlert::new(args.symbol, args.condition);
    if let Some(threshold) = args.threshold {
        request = request.with_threshold(threshold);
    }
    if let Some(notification) = args.notification {
        request = request.with_notification(notification);
    }

    let parameters = AlertParameters {
        period: args.period,
        date: args.date,
        time: args.time,
    };
    if parameters != AlertParameters::default() {
        request = request.with_parameters(parameters);
    }
    request
}

/// Verifies a saved webhook delivery and prints the parsed event.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the signature does not
/// match, or the payload is not a valid event.
pub fn verify_delivery<W: Write>(args: &VerifyArgs, out: &mut W) -> Result<(), RunError> {
    let event = check_delivery(
        &args.payload,
        &args.signature,
        &args.secret,
        args.timestamp.as_deref(),
    )?;
    tracing::info!("Signature valid for {} event", event.event);
    print_json(out, &event)
}

fn check_delivery(
    path: &Path,
    signature: &str,
    secret: &str,
    timestamp: Option<&str>,
) -> Result<WebhookEvent, RunError> {
    let payload = std::fs::read(path).map_err(|e| RunError::PayloadRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !webhook::verify(&payload, signature, secret, timestamp.map(Into::into)) {
        return Err(RunError::SignatureMismatch);
    }

    Ok(webhook::parse(payload.as_slice())?)
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), RunError> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(out, "{json}").map_err(RunError::Output)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
