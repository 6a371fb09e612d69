//! Per-origin rate limit cooldowns.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use url::Url;

use crate::transport::HttpResponse;

/// Values above this are treated as milliseconds rather than seconds.
const EPOCH_MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

/// Cooldown state keyed by origin (`scheme://host[:port]`).
///
/// An entry is written only when the server answers 429 and is dropped
/// once its reset time has passed.
#[derive(Debug, Default)]
pub struct RateLimitState {
    resets: Mutex<HashMap<String, u64>>,
}

impl RateLimitState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether a request to `origin` may be sent at `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns the remaining wait in whole seconds (rounded up) while the
    /// origin is cooling down.
    pub fn check(&self, origin: &str, now_ms: u64) -> Result<(), u64> {
        let mut resets = self.resets.lock().unwrap_or_else(PoisonError::into_inner);
        match resets.get(origin) {
            Some(&reset_at) if reset_at > now_ms => Err((reset_at - now_ms).div_ceil(1000)),
            Some(_) => {
                resets.remove(origin);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Records that `origin` may not be contacted before `reset_at_ms`.
    pub fn record(&self, origin: &str, reset_at_ms: u64) {
        self.resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(origin.to_string(), reset_at_ms);
    }

    /// Returns the stored reset time for `origin`, if any.
    #[must_use]
    pub fn reset_at(&self, origin: &str) -> Option<u64> {
        self.resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(origin)
            .copied()
    }
}

/// Returns the rate limit bucket key of a URL.
#[must_use]
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Computes how long to back off after a 429 response, in seconds.
///
/// Uses `Retry-After` (delta seconds) when present, then
/// `X-RateLimit-Reset` (Unix time in seconds, or milliseconds for large
/// values), then `default_secs`. The result is at least one second.
#[must_use]
pub fn retry_after_secs(response: &HttpResponse, now_ms: u64, default_secs: u64) -> u64 {
    let from_retry_after = response
        .header_str(http::header::RETRY_AFTER)
        .and_then(parse_seconds);

    let from_reset = || {
        response
            .header_str("x-ratelimit-reset")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|reset| {
                let reset_ms = if reset > EPOCH_MILLIS_THRESHOLD {
                    reset
                } else {
                    reset.saturating_mul(1000)
                };
                reset_ms.saturating_sub(now_ms).div_ceil(1000)
            })
    };

    from_retry_after
        .or_else(from_reset)
        .unwrap_or(default_secs)
        .max(1)
}

fn parse_seconds(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        // Safe cast: value is finite, non-negative and ceil'd
        .map(|secs| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let whole = secs.ceil() as u64;
            whole
        })
}
