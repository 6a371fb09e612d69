//! Inbound webhook handling.
//!
//! This module provides:
//! - Signature verification ([`verify`], [`verify_headers`]) and signing ([`sign`])
//! - Replay-window checks ([`is_timestamp_fresh`])
//! - Payload parsing and validation ([`parse`], [`WebhookEvent`])

mod payload;
mod signature;


pub use payload::{WebhookEvent, WebhookEventData, WebhookEventType, WebhookPayload, parse};
pub use signature::{
    SIGNATURE_HEADER, TIMESTAMP_HEADER, Timestamp, is_timestamp_fresh, sign, verify, verify_headers,
};
