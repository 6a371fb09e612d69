//! HMAC-SHA256 signatures for inbound webhook deliveries.
//!
//! Two signing modes are recognised:
//!
//! - **Timestamped**: the signed message is `"{timestamp}.{payload}"`, binding
//!   the signature to the delivery time.
//! - **Legacy**: the signed message is the payload alone.
//!
//! Signatures are lowercase hex, optionally prefixed with `sha256=`.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "x-stockalert-signature";

/// Header carrying the delivery timestamp.
pub const TIMESTAMP_HEADER: &str = "x-stockalert-timestamp";

const SIGNATURE_PREFIX: &str = "sha256=";

/// A delivery timestamp as it enters the signed message.
///
/// Built from header text or from a number of seconds, so both
/// `Some("1700000000".into())` and `Some(1_700_000_000_u64.into())` work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp<'a> {
    /// Timestamp text, signed exactly as given.
    Text(&'a str),
    /// Unsigned seconds.
    Unsigned(u64),
    /// Signed seconds.
    Signed(i64),
}

impl Timestamp<'_> {
    fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Timestamp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Unsigned(secs) => write!(f, "{secs}"),
            Self::Signed(secs) => write!(f, "{secs}"),
        }
    }
}

impl<'a> From<&'a str> for Timestamp<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Timestamp<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<u64> for Timestamp<'_> {
    fn from(secs: u64) -> Self {
        Self::Unsigned(secs)
    }
}

impl From<u32> for Timestamp<'_> {
    fn from(secs: u32) -> Self {
        Self::Unsigned(secs.into())
    }
}

impl From<i64> for Timestamp<'_> {
    fn from(secs: i64) -> Self {
        Self::Signed(secs)
    }
}

/// Verifies a webhook signature.
///
/// Never fails: any malformed input (empty fields, non-hex signature,
/// length mismatch) yields `false`. Timestamp freshness is not checked;
/// see [`is_timestamp_fresh`].
///
/// # Example
///
/// ```
/// use stockalert::webhook::{sign, verify};
///
/// let body = r#"{"id":"evt_1"}"#;
/// let signature = sign(body, "whsec_test", Some("1700000000".into()));
///
/// let prefixed = format!("sha256={signature}");
/// assert!(verify(body, &prefixed, "whsec_test", Some(1_700_000_000_u64.into())));
/// assert!(!verify(body, &signature, "whsec_test", None));
/// ```
#[must_use]
pub fn verify(
    payload: impl AsRef<[u8]>,
    signature: &str,
    secret: &str,
    timestamp: Option<Timestamp<'_>>,
) -> bool {
    let payload = payload.as_ref();
    let signature = signature.trim();
    let signature = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);

    if payload.is_empty() || signature.is_empty() || secret.is_empty() {
        return false;
    }
    if timestamp.is_some_and(|ts| ts.is_empty()) {
        return false;
    }

    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let expected = compute(payload, secret, timestamp);

    // Length is public; only equal-length inputs go through the constant-time path.
    if provided.len() != expected.len() {
        return false;
    }
    provided.ct_eq(&expected).into()
}

/// Computes the signature of `payload` as lowercase hex, without prefix.
#[must_use]
pub fn sign(
    payload: impl AsRef<[u8]>,
    secret: &str,
    timestamp: Option<Timestamp<'_>>,
) -> String {
    hex::encode(compute(payload.as_ref(), secret, timestamp))
}

/// Verifies a delivery using its signature and timestamp headers.
///
/// Returns `false` if the signature header is missing or not valid text.
#[must_use]
pub fn verify_headers(headers: &http::HeaderMap, payload: impl AsRef<[u8]>, secret: &str) -> bool {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let timestamp = headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Timestamp::from);

    verify(payload, signature, secret, timestamp)
}

/// Returns true if `timestamp_secs` lies within `tolerance_secs` of `now_secs`.
///
/// Skew in either direction is tolerated up to the same bound.
#[must_use]
pub const fn is_timestamp_fresh(timestamp_secs: u64, now_secs: u64, tolerance_secs: u64) -> bool {
    timestamp_secs.abs_diff(now_secs) <= tolerance_secs
}

fn compute(payload: &[u8], secret: &str, timestamp: Option<Timestamp<'_>>) -> Vec<u8> {
    let payload = String::from_utf8_lossy(payload);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    if let Some(ts) = timestamp {
        mac.update(ts.to_string().as_bytes());
        mac.update(b".");
    }
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
