//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::resources::{AlertCondition, AlertStatus, NotificationChannel};

/// StockAlert: manage stock alerts from the command line
///
/// Talks to the StockAlert.pro API and verifies webhook deliveries.
#[derive(Debug, Parser)]
#[command(name = "stockalert")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// API key (`sk_...`)
    #[arg(long, env = "STOCKALERT_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Bearer token, used instead of the API key when present
    #[arg(
        long,
        env = "STOCKALERT_BEARER_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub bearer_token: Option<String>,

    /// API base URL
    #[arg(long, env = "STOCKALERT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Per-attempt request timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout: Option<u64>,

    /// Maximum number of retries after the first attempt
    #[arg(long = "max-retries", global = true)]
    pub max_retries: Option<u32>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for stockalert
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file (default: user config directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Manage alerts
    Alerts {
        /// Alert operation
        #[command(subcommand)]
        command: AlertsCommand,
    },

    /// Look up stocks
    Stocks {
        /// Stock operation
        #[command(subcommand)]
        command: StocksCommand,
    },

    /// Inspect the watchlist
    Watchlist {
        /// Watchlist operation
        #[command(subcommand)]
        command: WatchlistCommand,
    },

    /// Show the authenticated user's profile
    User,

    /// Verify a webhook delivery saved to a file (offline)
    Verify(VerifyArgs),
}

/// Alert subcommands.
#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts
    List {
        /// Only alerts in this state (active, paused, triggered)
        #[arg(long)]
        status: Option<AlertStatus>,

        /// Only alerts for this symbol
        #[arg(long)]
        symbol: Option<String>,

        /// Fetch every page instead of a single one
        #[arg(long)]
        all: bool,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size (1-100)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show an alert
    Get {
        /// Alert id
        id: String,
    },

    /// Create an alert
    Create(CreateAlertArgs),

    /// Delete an alert
    Delete {
        /// Alert id
        id: String,
    },

    /// Pause an alert
    Pause {
        /// Alert id
        id: String,
    },

    /// Re-activate a paused alert
    Activate {
        /// Alert id
        id: String,
    },
}

/// Arguments for `alerts create`.
#[derive(Debug, Args)]
pub struct CreateAlertArgs {
    /// Ticker symbol
    pub symbol: String,

    /// Condition type (e.g. `price_above`, `rsi_limit`, `daily_reminder`)
    pub condition: AlertCondition,

    /// Condition threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Notification channel (email, sms)
    #[arg(long)]
    pub notification: Option<NotificationChannel>,

    /// Moving average period (50 or 200)
    #[arg(long)]
    pub period: Option<u32>,

    /// Reminder date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Daily reminder time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
}

/// Stock subcommands.
#[derive(Debug, Subcommand)]
pub enum StocksCommand {
    /// Show a stock
    Get {
        /// Ticker symbol
        symbol: String,
    },

    /// Search stocks by symbol or name
    Search {
        /// Search text
        query: String,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Watchlist subcommands.
#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// List watchlist entries
    List,
}

/// Arguments for `verify`.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// File containing the raw request body
    pub payload: PathBuf,

    /// Value of the `X-StockAlert-Signature` header
    #[arg(long)]
    pub signature: String,

    /// Webhook signing secret
    #[arg(long, env = "STOCKALERT_WEBHOOK_SECRET", hide_env_values = true)]
    pub secret: String,

    /// Value of the `X-StockAlert-Timestamp` header, if sent
    #[arg(long)]
    pub timestamp: Option<String>,
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
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns true if the command runs without contacting the API.
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. } | Command::Verify(_)))
    }
}
