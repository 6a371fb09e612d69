//! StockAlert: typed client for the StockAlert.pro alerting API
//!
//! A library for managing stock alerts, webhooks, watchlists and API keys,
//! and for verifying inbound webhook deliveries.
//!
//! Requests go through a [`engine::RequestEngine`] that handles
//! authentication, timeouts, retries with backoff, rate limit cooldowns,
//! deduplication of concurrent GETs and response envelope unwrapping.

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod resources;
pub mod time;
pub mod transport;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
