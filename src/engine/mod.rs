//! Request execution engine.
//!
//! This module turns a logical API call into an HTTP exchange:
//! - Authentication header selection and request building ([`RequestOptions`], [`Query`])
//! - Per-attempt timeouts, retries with backoff, cancellation ([`RequestEngine`])
//! - Per-origin rate limit tracking ([`RateLimitState`])
//! - Deduplication of identical in-flight GET requests
//! - Response envelope unwrapping ([`Paginated`], [`ResponseMeta`])

#[allow(clippy::module_inception)]
mod engine;
mod envelope;
mod pending;
mod rate_limit;
mod request;


pub use engine::RequestEngine;
pub use envelope::{Paginated, Pagination, RateLimitInfo, ResponseMeta};
pub use rate_limit::{RateLimitState, origin_of, retry_after_secs};
pub use request::{Query, RequestOptions};
