//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Directory under the platform config dir holding the config file.
const APP_DIR: &str = "stockalert";

/// Config file name.
const FILE_NAME: &str = "config.toml";

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Client configuration section
    #[serde(default)]
    pub client: ClientSection,
}

/// Client configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// API key
    pub api_key: Option<String>,

    /// Bearer token, preferred over the API key
    pub bearer_token: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    pub timeout: Option<u64>,

    /// Maximum number of retries
    pub max_retries: Option<u32>,

    /// Log every request and response
    #[serde(default)]
    pub debug: bool,

    /// Custom `User-Agent`
    pub user_agent: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Default config file location: `<config dir>/stockalert/config.toml`.
    ///
    /// Returns `None` when the platform has no config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    format!(
        r#"# StockAlert Configuration File
#
# Values given on the command line or through STOCKALERT_* environment
# variables take precedence over this file.

[client]
# API key from your StockAlert.pro account settings
# api_key = "sk_your_api_key_here"

# Bearer token; used instead of the API key when set
# bearer_token = "..."

# API base URL
# base_url = "{base_url}"

# Per-attempt request timeout in milliseconds (default: {timeout})
# timeout = {timeout}

# Maximum number of retries after the first attempt (default: {retries})
# max_retries = {retries}

# Log every request and response
# debug = false

# Custom User-Agent header
# user_agent = "my-app/1.0"
"#,
        base_url = super::defaults::BASE_URL,
        timeout = super::defaults::TIMEOUT_MS,
        retries = super::defaults::MAX_RETRIES,
    )
}
