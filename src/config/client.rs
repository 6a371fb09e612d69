//! Client configuration and its validation.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use url::Url;

use super::defaults;
use crate::error::{Error, Result};

/// Recognised API key format: `sk_` prefix followed by at least 20 key characters.
static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^sk_[A-Za-z0-9_-]{20,}$").expect("API key pattern is a valid regex")
});

/// Credentials attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as `X-API-Key: <key>`.
    ApiKey(String),
    /// Sent as `Authorization: Bearer <token>`.
    Bearer(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Client configuration as supplied by the caller.
///
/// Built with the `with_*` methods and checked by [`ClientConfig::validate`]
/// when a [`Client`](crate::Client) is constructed.
///
/// # Example
///
/// ```
/// use stockalert::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("sk_0123456789abcdefghijKLMN")
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(5);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: Option<String>,
    bearer_token: Option<String>,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    debug: bool,
    user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Creates a configuration with default settings and no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: None,
            bearer_token: None,
            base_url: defaults::BASE_URL.to_string(),
            timeout: defaults::timeout(),
            max_retries: defaults::MAX_RETRIES,
            debug: false,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }

    /// Builds a configuration from `STOCKALERT_*` environment variables.
    ///
    /// Missing variables leave the corresponding setting at its default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(key) = std::env::var(defaults::ENV_API_KEY) {
            config = config.with_api_key(key);
        }
        if let Ok(token) = std::env::var(defaults::ENV_BEARER_TOKEN) {
            config = config.with_bearer_token(token);
        }
        if let Ok(url) = std::env::var(defaults::ENV_BASE_URL) {
            config = config.with_base_url(url);
        }
        config
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the bearer token. Preferred over the API key when both are set.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the base URL. Trailing slashes are stripped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of retries after the initial attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Enables per-request debug logging.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the configured base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum number of retries.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns true if per-request debug logging is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Checks the configuration and resolves the credentials to use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when:
    /// - neither an API key nor a bearer token is present
    /// - no bearer token is present and the API key has an unrecognised format
    /// - the base URL is not an absolute http(s) URL
    /// - the timeout is zero
    pub fn validate(&self) -> Result<Credentials> {
        let credentials = self.resolve_credentials()?;

        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_field("base_url", format!("Invalid base URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_field(
                "base_url",
                "Base URL must use http or https",
            ));
        }

        if self.timeout.is_zero() {
            return Err(Error::invalid_field(
                "timeout",
                "Timeout must be greater than 0",
            ));
        }

        Ok(credentials)
    }

    fn resolve_credentials(&self) -> Result<Credentials> {
        let bearer = self.bearer_token.as_deref().filter(|t| !t.trim().is_empty());
        if let Some(token) = bearer {
            return Ok(Credentials::Bearer(token.to_string()));
        }

        let api_key = self.api_key.as_deref().filter(|k| !k.trim().is_empty());
        let Some(key) = api_key else {
            return Err(Error::invalid_field(
                "api_key",
                "API key or bearer token is required",
            ));
        };

        if !API_KEY_PATTERN.is_match(key) {
            return Err(Error::invalid_field("api_key", "Invalid API key format"));
        }

        Ok(Credentials::ApiKey(key.to_string()))
    }
}
