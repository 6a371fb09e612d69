//! API resource types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::webhook::WebhookEventType;

/// Alert lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Being evaluated
    Active,
    /// Temporarily disabled
    Paused,
    /// Condition met
    Triggered,
}

impl AlertStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Triggered => "triggered",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "triggered" => Ok(Self::Triggered),
            other => Err(format!("unknown alert status '{other}'")),
        }
    }
}

/// Where alert notifications are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    /// E-mail notification
    #[default]
    Email,
    /// Text message
    Sms,
}

impl NotificationChannel {
    /// Returns the wire name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            other => Err(format!("unknown notification channel '{other}'")),
        }
    }
}

/// Alert condition types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// Price rises above the threshold
    PriceAbove,
    /// Price falls below the threshold
    PriceBelow,
    /// Daily gain reaches the threshold percentage
    PriceChangeUp,
    /// Daily loss reaches the threshold percentage
    PriceChangeDown,
    /// New 52-week high
    NewHigh,
    /// New 52-week low
    NewLow,
    /// 50-day average crosses above the 200-day average
    MaCrossoverGolden,
    /// 50-day average crosses below the 200-day average
    MaCrossoverDeath,
    /// Price touches a moving average from above
    MaTouchAbove,
    /// Price touches a moving average from below
    MaTouchBelow,
    /// Volume exceeds its average by the threshold percentage
    VolumeChange,
    /// RSI crosses the threshold
    RsiLimit,
    /// P/E ratio falls below the threshold
    PeRatioBelow,
    /// P/E ratio rises above the threshold
    PeRatioAbove,
    /// Forward P/E falls below the threshold
    ForwardPeBelow,
    /// Forward P/E rises above the threshold
    ForwardPeAbove,
    /// Upcoming earnings report
    EarningsAnnouncement,
    /// Upcoming ex-dividend date
    DividendExDate,
    /// Upcoming dividend payment
    DividendPayment,
    /// One-off reminder on a date
    Reminder,
    /// Reminder at a time of day
    DailyReminder,
}

impl AlertCondition {
    /// Every condition type.
    pub const ALL: [Self; 21] = [
        Self::PriceAbove,
        Self::PriceBelow,
        Self::PriceChangeUp,
        Self::PriceChangeDown,
        Self::NewHigh,
        Self::NewLow,
        Self::MaCrossoverGolden,
        Self::MaCrossoverDeath,
        Self::MaTouchAbove,
        Self::MaTouchBelow,
        Self::VolumeChange,
        Self::RsiLimit,
        Self::PeRatioBelow,
        Self::PeRatioAbove,
        Self::ForwardPeBelow,
        Self::ForwardPeAbove,
        Self::EarningsAnnouncement,
        Self::DividendExDate,
        Self::DividendPayment,
        Self::Reminder,
        Self::DailyReminder,
    ];

    /// Returns the wire name of the condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAbove => "price_above",
            Self::PriceBelow => "price_below",
            Self::PriceChangeUp => "price_change_up",
            Self::PriceChangeDown => "price_change_down",
            Self::NewHigh => "new_high",
            Self::NewLow => "new_low",
            Self::MaCrossoverGolden => "ma_crossover_golden",
            Self::MaCrossoverDeath => "ma_crossover_death",
            Self::MaTouchAbove => "ma_touch_above",
            Self::MaTouchBelow => "ma_touch_below",
            Self::VolumeChange => "volume_change",
            Self::RsiLimit => "rsi_limit",
            Self::PeRatioBelow => "pe_ratio_below",
            Self::PeRatioAbove => "pe_ratio_above",
            Self::ForwardPeBelow => "forward_pe_below",
            Self::ForwardPeAbove => "forward_pe_above",
            Self::EarningsAnnouncement => "earnings_announcement",
            Self::DividendExDate => "dividend_ex_date",
            Self::DividendPayment => "dividend_payment",
            Self::Reminder => "reminder",
            Self::DailyReminder => "daily_reminder",
        }
    }

    /// Returns true if the condition needs a numeric threshold.
    #[must_use]
    pub const fn requires_threshold(self) -> bool {
        matches!(
            self,
            Self::PriceAbove
                | Self::PriceBelow
                | Self::PriceChangeUp
                | Self::PriceChangeDown
                | Self::VolumeChange
                | Self::RsiLimit
                | Self::PeRatioBelow
                | Self::PeRatioAbove
                | Self::ForwardPeBelow
                | Self::ForwardPeAbove
        )
    }

    /// Returns true for moving-average conditions.
    #[must_use]
    pub const fn is_moving_average(self) -> bool {
        matches!(
            self,
            Self::MaCrossoverGolden
                | Self::MaCrossoverDeath
                | Self::MaTouchAbove
                | Self::MaTouchBelow
        )
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlertCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| format!("unknown alert condition '{s}'"))
    }
}

/// Condition-specific alert parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertParameters {
    /// Moving average period (50 or 200)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Reminder date (`YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Daily reminder time (`HH:MM`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl AlertParameters {
    fn is_empty(&self) -> bool {
        self.period.is_none() && self.date.is_none() && self.time.is_none()
    }
}

/// An alert as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier (UUID)
    pub id: String,
    /// Ticker symbol
    pub symbol: String,
    /// Condition type
    pub condition: AlertCondition,
    /// Condition threshold
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Notification channel
    pub notification: NotificationChannel,
    /// Lifecycle state
    pub status: AlertStatus,
    /// Condition-specific parameters
    #[serde(default)]
    pub parameters: Option<AlertParameters>,
    /// Company name
    #[serde(default)]
    pub stock_name: Option<String>,
    /// Price when the alert was created
    #[serde(default)]
    pub initial_price: Option<f64>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time (ISO 8601)
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Last trigger time (ISO 8601)
    #[serde(default)]
    pub last_triggered_at: Option<String>,
}

/// Input for creating an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAlert {
    /// Ticker symbol
    pub symbol: String,
    /// Condition type
    pub condition: AlertCondition,
    /// Condition threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// Notification channel
    #[serde(default)]
    pub notification: NotificationChannel,
    /// Condition-specific parameters
    #[serde(default, skip_serializing_if = "is_unset")]
    pub parameters: Option<AlertParameters>,
}

fn is_unset(parameters: &Option<AlertParameters>) -> bool {
    parameters.as_ref().is_none_or(AlertParameters::is_empty)
}

impl CreateAlert {
    /// Creates an alert request with e-mail notification and no threshold.
    pub fn new(symbol: impl Into<String>, condition: AlertCondition) -> Self {
        Self {
            symbol: symbol.into(),
            condition,
            threshold: None,
            notification: NotificationChannel::Email,
            parameters: None,
        }
    }

    /// Sets the threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Sets the notification channel.
    #[must_use]
    pub const fn with_notification(mut self, notification: NotificationChannel) -> Self {
        self.notification = notification;
        self
    }

    /// Sets the condition parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: AlertParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Fields to change on an existing alert. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAlert {
    /// New threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// New notification channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationChannel>,
    /// New lifecycle state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    /// New condition parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<AlertParameters>,
}

/// Sort direction for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortDirection {
    /// Returns the wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters and paging for listing alerts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAlertsParams {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Page size (1..=100)
    pub limit: Option<u32>,
    /// Only alerts in this state
    pub status: Option<AlertStatus>,
    /// Only alerts with this condition
    pub condition: Option<AlertCondition>,
    /// Only alerts for this symbol
    pub symbol: Option<String>,
    /// Field to sort by
    pub sort_field: Option<String>,
    /// Sort direction
    pub sort_direction: Option<SortDirection>,
}

/// A webhook subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    /// Webhook identifier (UUID)
    pub id: String,
    /// Delivery URL
    pub url: String,
    /// Subscribed events
    pub events: Vec<WebhookEventType>,
    /// Whether deliveries are enabled
    #[serde(default = "enabled")]
    pub is_active: bool,
    /// Signing secret, returned only on creation
    #[serde(default)]
    pub secret: Option<String>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}

const fn enabled() -> bool {
    true
}

/// Input for creating a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhook {
    /// Delivery URL (https)
    pub url: String,
    /// Events to subscribe to
    pub events: Vec<WebhookEventType>,
}

/// Outcome of a test delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTestResult {
    /// Whether the endpoint accepted the delivery
    #[serde(default)]
    pub success: bool,
    /// HTTP status returned by the endpoint
    #[serde(default)]
    pub status_code: Option<u16>,
    /// Diagnostic message
    #[serde(default)]
    pub message: Option<String>,
}

/// A watched stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Ticker symbol
    pub symbol: String,
    /// Entry identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Company name
    #[serde(default)]
    pub name: Option<String>,
    /// Latest price
    #[serde(default)]
    pub price: Option<f64>,
    /// Daily change in percent
    #[serde(default)]
    pub change_percent: Option<f64>,
    /// Free-form note
    #[serde(default)]
    pub notes: Option<String>,
    /// When the symbol was added (ISO 8601)
    #[serde(default)]
    pub added_at: Option<String>,
}

/// Input for adding a symbol to the watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToWatchlist {
    /// Ticker symbol
    pub symbol: String,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AddToWatchlist {
    /// Creates a request for `symbol` without notes.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            notes: None,
        }
    }
}

/// Stock quote and reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Ticker symbol
    pub symbol: String,
    /// Company name
    #[serde(default)]
    pub name: Option<String>,
    /// Listing exchange
    #[serde(default)]
    pub exchange: Option<String>,
    /// Quote currency
    #[serde(default)]
    pub currency: Option<String>,
    /// Latest price
    #[serde(default)]
    pub price: Option<f64>,
    /// Daily change
    #[serde(default)]
    pub change: Option<f64>,
    /// Daily change in percent
    #[serde(default)]
    pub change_percent: Option<f64>,
    /// Daily volume
    #[serde(default)]
    pub volume: Option<u64>,
    /// Market capitalisation
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Quote time (ISO 8601)
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An API key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    /// Key identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Leading characters of the key
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// Full key, returned only on creation
    #[serde(default)]
    pub key: Option<String>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last use (ISO 8601)
    #[serde(default)]
    pub last_used_at: Option<String>,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key_prefix", &self.key_prefix)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .field("last_used_at", &self.last_used_at)
            .finish()
    }
}

/// Input for creating an API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateApiKey {
    /// Display name (1..=100 characters)
    pub name: String,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: String,
    /// E-mail address
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Subscription plan
    #[serde(default)]
    pub plan: Option<String>,
    /// Sign-up time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
}
