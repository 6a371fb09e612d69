//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default API endpoint.
pub const BASE_URL: &str = "https://stockalert.pro/api/public/v1";

/// Default per-attempt request timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 30_000;

/// Default maximum number of retries after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

/// Default `User-Agent` header value.
pub const USER_AGENT: &str = concat!("stockalert-rust/", env!("CARGO_PKG_VERSION"));

/// Cooldown applied after a 429 response without usable reset headers, in seconds.
pub const RATE_LIMIT_COOLDOWN_SECS: u64 = 60;

/// Maximum number of concurrent requests issued by batch operations.
pub const BATCH_CONCURRENCY: usize = 5;

/// Default page size used when iterating alerts.
pub const PAGE_SIZE: u32 = 50;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "STOCKALERT_API_KEY";

/// Environment variable holding the bearer token.
pub const ENV_BEARER_TOKEN: &str = "STOCKALERT_BEARER_TOKEN";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "STOCKALERT_BASE_URL";

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}
