//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the binary. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::Cli;
use super::client::ClientConfig;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the binary.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config,
/// or [`ValidatedConfig::load`] to also locate and read the config file.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Client settings with credentials already checked
    pub client: ClientConfig,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, timeout: {}ms, max_retries: {}, debug: {} }}",
            self.client.base_url(),
            self.client.timeout().as_millis(),
            self.client.max_retries(),
            self.client.debug(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments (and their environment fallbacks) take precedence over
    /// TOML config values, which take precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Neither an API key nor a bearer token is available
    /// - The timeout is zero
    /// - The client rejects the merged settings (bad key format, bad URL)
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let section = toml.map(|t| &t.client);

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| section.and_then(|s| s.api_key.clone()));
        let bearer_token = cli
            .bearer_token
            .clone()
            .or_else(|| section.and_then(|s| s.bearer_token.clone()));

        if api_key.is_none() && bearer_token.is_none() {
            return Err(ConfigError::missing(
                field::CREDENTIALS,
                "Use --api-key, STOCKALERT_API_KEY or set client.api_key in config file",
            ));
        }

        let timeout = Self::resolve_timeout(cli, toml)?;

        let max_retries = cli
            .max_retries
            .or_else(|| section.and_then(|s| s.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| section.and_then(|s| s.base_url.clone()))
            .unwrap_or_else(|| defaults::BASE_URL.to_string());

        let mut client = ClientConfig::new()
            .with_base_url(base_url)
            .with_timeout(timeout)
            .with_max_retries(max_retries)
            .with_debug(cli.verbose || section.is_some_and(|s| s.debug));

        if let Some(key) = api_key {
            client = client.with_api_key(key);
        }
        if let Some(token) = bearer_token {
            client = client.with_bearer_token(token);
        }
        if let Some(user_agent) = section.and_then(|s| s.user_agent.clone()) {
            client = client.with_user_agent(user_agent);
        }

        client.validate().map_err(ConfigError::InvalidClient)?;

        Ok(Self {
            client,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and the config file.
    ///
    /// Reads `cli.config` if set. Otherwise the default location is used
    /// when a file exists there.
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
            .or_else(|| TomlConfig::default_path().filter(|p| p.is_file()));

        let toml = match path {
            Some(ref path) => Some(TomlConfig::load(path)?),
            None => None,
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let millis = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.client.timeout))
            .unwrap_or(defaults::TIMEOUT_MS);

        if millis == 0 {
            return Err(ConfigError::InvalidDuration {
                field: field::TIMEOUT,
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_millis(millis))
    }
}

/// Resolves where `init` writes the template.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if no path was given and the platform
/// has no config directory.
pub fn init_path(output: Option<&Path>) -> Result<PathBuf, ConfigError> {
    output
        .map(Path::to_path_buf)
        .or_else(TomlConfig::default_path)
        .ok_or(ConfigError::NoConfigDir)
}

/// Writes the default configuration template to a file.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let to_write_error = |e: std::io::Error| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }

    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(to_write_error)
}
