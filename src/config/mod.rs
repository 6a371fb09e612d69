//! Configuration layer for StockAlert.
//!
//! This module provides:
//! - Library client configuration ([`ClientConfig`])
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration for the binary ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! The binary resolves values with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - including their `STOCKALERT_*` environment fallbacks
//! 2. **TOML config file** - `--config`, or `<config dir>/stockalert/config.toml` if present
//! 3. **Built-in defaults** - see [`defaults`]
//!
//! `user_agent` is TOML-only. Request logging (`debug`) is enabled by either
//! `client.debug` or `--verbose`.

mod cli;
mod client;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{
    AlertsCommand, Cli, Command, CreateAlertArgs, StocksCommand, VerifyArgs, WatchlistCommand,
};
pub use client::{ClientConfig, Credentials};
pub use error::{ConfigError, field};
pub use toml::{ClientSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, init_path, write_default_config};
