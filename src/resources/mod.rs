//! Resource façades over the request engine.
//!
//! Each façade validates its input before building a request, so invalid
//! calls fail with [`Error::Validation`](crate::Error::Validation) without
//! touching the network.

mod alerts;
mod api_keys;
mod models;
mod stocks;
mod user;
mod validate;
mod watchlist;
mod webhooks;

#[cfg(test)]
mod alerts_tests;

pub use alerts::{Alerts, BATCH_CONCURRENCY};
pub use api_keys::ApiKeys;
pub use models::{
    AddToWatchlist, Alert, AlertCondition, AlertParameters, AlertStatus, ApiKey, CreateAlert,
    CreateApiKey, CreateWebhook, ListAlertsParams, NotificationChannel, SortDirection, Stock,
    UpdateAlert, User, WatchlistItem, Webhook, WebhookTestResult,
};
pub use stocks::Stocks;
pub use user::Users;
pub use validate::MAX_PAGE_SIZE;
pub use watchlist::Watchlist;
pub use webhooks::Webhooks;
