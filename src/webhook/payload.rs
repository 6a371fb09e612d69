//! Parsing and validation of inbound webhook payloads.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

const INVALID_JSON: &str = "Invalid JSON payload";
const INVALID_STRUCTURE: &str = "Invalid webhook payload structure";

/// Raw webhook body in any of the accepted forms.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload<'a> {
    /// Undecoded request body.
    Bytes(&'a [u8]),
    /// Request body as text.
    Text(&'a str),
    /// Already-decoded JSON.
    Json(Value),
}

impl<'a> From<&'a [u8]> for WebhookPayload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for WebhookPayload<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for WebhookPayload<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for WebhookPayload<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for WebhookPayload<'_> {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Recognised webhook event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// An alert condition was met.
    #[serde(rename = "alert.triggered")]
    AlertTriggered,
    /// An alert was created.
    #[serde(rename = "alert.created")]
    AlertCreated,
    /// An alert was updated.
    #[serde(rename = "alert.updated")]
    AlertUpdated,
    /// An alert was deleted.
    #[serde(rename = "alert.deleted")]
    AlertDeleted,
}

impl WebhookEventType {
    /// Every recognised event type.
    pub const ALL: [Self; 4] = [
        Self::AlertTriggered,
        Self::AlertCreated,
        Self::AlertUpdated,
        Self::AlertDeleted,
    ];

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlertTriggered => "alert.triggered",
            Self::AlertCreated => "alert.created",
            Self::AlertUpdated => "alert.updated",
            Self::AlertDeleted => "alert.deleted",
        }
    }

    /// Looks up an event type by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == name)
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert details carried by a webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventData {
    /// Alert identifier
    pub alert_id: String,
    /// Ticker symbol
    pub symbol: String,
    /// Alert condition name
    pub condition: String,
    /// Notification channel
    pub notification: String,
    /// Alert status
    pub status: String,
    /// Condition threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// When the alert triggered (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<String>,
    /// Price at trigger time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// A validated webhook event.
///
/// Only produced by [`parse`]: it has no `Deserialize` impl and cannot be
/// built with a struct literal outside this crate. The timestamp is always
/// numeric, whether it arrived as a JSON number or a numeric string.
///
/// ```compile_fail
/// let event: stockalert::webhook::WebhookEvent = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct WebhookEvent {
    /// Event identifier
    pub id: String,
    /// Event type
    pub event: WebhookEventType,
    /// Event time as sent by the server
    pub timestamp: f64,
    /// Alert details
    pub data: WebhookEventData,
}

/// Wire shape of an event before it is accepted.
#[derive(Deserialize)]
struct RawEvent {
    id: String,
    event: WebhookEventType,
    #[serde(deserialize_with = "numeric_timestamp")]
    timestamp: f64,
    data: WebhookEventData,
}

impl From<RawEvent> for WebhookEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            id: raw.id,
            event: raw.event,
            timestamp: raw.timestamp,
            data: raw.data,
        }
    }
}

/// Parses and validates a webhook payload.
///
/// # Errors
///
/// Returns [`Error::Validation`] with:
/// - `"Invalid JSON payload"` if the body is not UTF-8 or not JSON
/// - `"Invalid webhook payload structure"` for any schema violation
///
/// # Example
///
/// ```
/// use stockalert::webhook::{WebhookEventType, parse};
///
/// let body = r#"{
///     "id": "evt_1",
///     "event": "alert.triggered",
///     "timestamp": "1700000000000",
///     "data": {
///         "alert_id": "a1", "symbol": "AAPL", "condition": "price_above",
///         "notification": "email", "status": "triggered", "price": 201.5
///     }
/// }"#;
///
/// let event = parse(body).unwrap();
/// assert_eq!(event.event, WebhookEventType::AlertTriggered);
/// assert_eq!(event.timestamp, 1_700_000_000_000.0);
/// ```
pub fn parse<'a>(payload: impl Into<WebhookPayload<'a>>) -> Result<WebhookEvent> {
    let value = match payload.into() {
        WebhookPayload::Bytes(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| Error::invalid_field("payload", INVALID_JSON))?;
            decode(text)?
        }
        WebhookPayload::Text(text) => decode(text)?,
        WebhookPayload::Json(value) => value,
    };

    // Struct deserialization would also accept arrays; only objects are events.
    let is_object = |v: Option<&Value>| v.is_some_and(Value::is_object);
    if !is_object(Some(&value)) || !is_object(value.get("data")) {
        return Err(Error::invalid_field("payload", INVALID_STRUCTURE));
    }

    RawEvent::deserialize(value)
        .map(WebhookEvent::from)
        .map_err(|_| Error::invalid_field("payload", INVALID_STRUCTURE))
}

fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|_| Error::invalid_field("payload", INVALID_JSON))
}

fn numeric_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom("timestamp is not numeric"))?,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("timestamp is not finite"))
    }
}
