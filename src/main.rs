//! StockAlert command-line client
//!
//! Entry point for the stockalert application.

use stockalert::config::{
    Cli, Command, ValidatedConfig, VerifyArgs, init_path, write_default_config,
};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, report_config_error, report_run_error, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Offline subcommands need no credentials
    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output.as_deref()),
        Some(Command::Verify(args)) => {
            setup_tracing(cli.verbose);
            return handle_verify(args);
        }
        Some(_) => {}
        None => {
            eprintln!("No command given. Run 'stockalert --help' for usage.");
            return exit_code::CONFIG_ERROR;
        }
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => return report_config_error(&e),
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    let Some(command) = cli.command else {
        return exit_code::CONFIG_ERROR;
    };
    run_application(config, command)
}

/// Handles the `init` subcommand.
fn handle_init(output: Option<&std::path::Path>) -> ExitCode {
    let result = init_path(output).and_then(|path| write_default_config(&path).map(|()| path));

    match result {
        Ok(path) => {
            println!("Configuration template written to: {}", path.display());
            exit_code::SUCCESS
        }
        Err(e) => report_config_error(&e),
    }
}

/// Handles the `verify` subcommand.
fn handle_verify(args: &VerifyArgs) -> ExitCode {
    match run::verify_delivery(args, &mut std::io::stdout()) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => report_run_error("Verification failed", &e),
    }
}

/// Runs an API command with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig, command: Command) -> ExitCode {
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(config, command)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => report_run_error("Command failed", &e),
    }
}
