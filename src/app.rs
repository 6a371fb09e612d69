//! Process plumbing for the `stockalert` binary: exit statuses, user-facing
//! hints and log setup.

use std::process::ExitCode;

use stockalert::ErrorKind;
use stockalert::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

/// Exit statuses reported by the binary.
pub mod exit_code {
    use std::process::ExitCode;

    /// The command completed.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Arguments or configuration were rejected before any request was made.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// The command ran and failed (status 2).
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

const INIT_HINT: &str = "Run 'stockalert init' to generate a configuration template.";

/// Suggests a next step for a configuration failure, if one applies.
pub fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::CREDENTIALS => {
            Some(INIT_HINT)
        }
        ConfigError::FileRead { .. } => Some(INIT_HINT),
        ConfigError::NoConfigDir => {
            Some("Pass an explicit path: 'stockalert init --output <FILE>'.")
        }
        ConfigError::InvalidClient(_) => {
            Some("API keys start with 'sk_'; base URLs must be absolute http(s) URLs.")
        }
        _ => None,
    }
}

/// Suggests a next step for a failed command, if one applies.
pub fn run_hint(error: &RunError) -> Option<&'static str> {
    match error {
        RunError::Api(e) => match e.kind() {
            ErrorKind::Authentication => {
                Some("Check STOCKALERT_API_KEY or client.api_key in the config file.")
            }
            ErrorKind::RateLimit => Some("The API is throttling this key; try again later."),
            _ => None,
        },
        RunError::SignatureMismatch => {
            Some("Check the webhook secret and pass the delivery's --timestamp if it had one.")
        }
        _ => None,
    }
}

/// Prints a configuration failure and its hint to stderr.
pub fn report_config_error(error: &ConfigError) -> ExitCode {
    eprintln!("Configuration error: {error}");
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
    exit_code::CONFIG_ERROR
}

/// Logs a command failure, prints its hint and picks the exit status.
pub fn report_run_error(context: &str, error: &RunError) -> ExitCode {
    tracing::error!("{context}: {error}");
    if let Some(hint) = run_hint(error) {
        eprintln!("\n{hint}");
    }
    exit_code::runtime_error()
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` overrides the level chosen by `verbose`.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_point_at_init() {
        let error = ConfigError::missing(field::CREDENTIALS, "set an API key");
        assert_eq!(config_hint(&error), Some(INIT_HINT));
    }

    #[test]
    fn invalid_duration_has_no_hint() {
        let error = ConfigError::InvalidDuration {
            field: field::TIMEOUT,
            reason: "must be greater than 0".to_string(),
        };
        assert_eq!(config_hint(&error), None);
    }

    #[test]
    fn authentication_failure_mentions_api_key() {
        let error = RunError::from(stockalert::Error::authentication("Invalid API key"));
        assert!(run_hint(&error).is_some_and(|hint| hint.contains("API_KEY")));
    }

    #[test]
    fn signature_mismatch_mentions_secret() {
        assert!(run_hint(&RunError::SignatureMismatch).is_some_and(|hint| hint.contains("secret")));
    }

    #[test]
    fn api_failures_have_no_hint() {
        let error = RunError::from(stockalert::Error::api("Alert not found", 404, None));
        assert_eq!(run_hint(&error), None);
    }
}
