//! Per-call request options.

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Ordered query string parameters.
///
/// Missing (`None`) and empty values are dropped when added, so optional
/// filters can be passed through without checks at every call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends a parameter unless its string form is empty.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Appends a parameter when present and non-empty.
    #[must_use]
    pub fn with_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the parameters in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// Options for a single [`RequestEngine`](super::RequestEngine) call.
///
/// Every field is optional; unset fields fall back to the client configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query string parameters
    pub query: Query,
    /// Extra headers, applied after the defaults. An `Authorization` header
    /// here replaces the configured credentials.
    pub headers: HeaderMap,
    /// JSON request body
    pub body: Option<Value>,
    /// Per-attempt timeout override
    pub timeout: Option<Duration>,
    /// Maximum retries override
    pub retries: Option<u32>,
    /// Token that aborts the whole operation, pending retries included
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets a raw JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` into the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `body` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::validation(format!("Request body is not valid JSON: {e}")))?;
        Ok(self.with_body(value))
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the maximum number of retries.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_skips_empty_and_missing_values() {
        let query = Query::new()
            .with("symbol", "AAPL")
            .with("status", "")
            .with_opt("page", Some(2))
            .with_opt::<u32>("limit", None)
            .with_opt("condition", Some(""));

        assert_eq!(
            query.pairs(),
            &[
                ("symbol".to_string(), "AAPL".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn query_serializes_values_with_to_string() {
        let query = Query::new().with("threshold", 1.5).with("active", true);

        assert_eq!(query.pairs()[0].1, "1.5");
        assert_eq!(query.pairs()[1].1, "true");
    }

    #[test]
    fn with_json_serializes_structs() {
        #[derive(Serialize)]
        struct Body {
            symbol: &'static str,
        }

        let options = RequestOptions::new().with_json(&Body { symbol: "MSFT" }).unwrap();
        assert_eq!(options.body, Some(serde_json::json!({"symbol": "MSFT"})));
    }

    #[test]
    fn builder_sets_overrides() {
        let token = CancellationToken::new();
        let options = RequestOptions::new()
            .with_timeout(Duration::from_secs(2))
            .with_retries(0)
            .with_cancel(token)
            .with_header(
                http::header::AUTHORIZATION,
                HeaderValue::from_static("Bearer override"),
            );

        assert_eq!(options.timeout, Some(Duration::from_secs(2)));
        assert_eq!(options.retries, Some(0));
        assert!(options.cancel.is_some());
        assert!(options.headers.contains_key(http::header::AUTHORIZATION));
    }
}
