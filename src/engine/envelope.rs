//! Response envelope handling.
//!
//! Every API response is wrapped as
//! `{ "success": bool, "data"?: T, "error"?: string|object, "meta"?: {...} }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Pagination details attached to list responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based)
    #[serde(default)]
    pub page: u32,
    /// Page size
    #[serde(default)]
    pub limit: u32,
    /// Total number of items
    #[serde(default)]
    pub total: u64,
    /// Total number of pages
    #[serde(default, alias = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    /// Returns true if another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Rate limit counters reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    /// Requests allowed in the current window
    #[serde(default)]
    pub limit: u32,
    /// Requests remaining in the current window
    #[serde(default)]
    pub remaining: u32,
    /// Window reset time (Unix seconds)
    #[serde(default)]
    pub reset: u64,
}

/// Metadata accompanying a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Present on list operations
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Present when the server reports quota usage
    #[serde(default)]
    pub rate_limit: Option<RateLimitInfo>,
}

/// A page of results together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Pagination and rate limit metadata
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl<T: DeserializeOwned> Paginated<T> {
    /// Decodes an unwrapped list payload.
    ///
    /// Accepts both the `{data, meta}` shape and a bare array (for
    /// responses that carry no metadata).
    ///
    /// # Errors
    ///
    /// Returns a non-retryable [`Error::Network`] if the payload has neither shape.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_array() {
            let data = serde_json::from_value(value).map_err(Error::decode)?;
            return Ok(Self {
                data,
                meta: ResponseMeta::default(),
            });
        }
        serde_json::from_value(value).map_err(Error::decode)
    }
}

impl<T> Paginated<T> {
    /// Returns the pagination details, if any.
    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.meta.pagination.as_ref()
    }
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    meta: Option<Value>,
}

/// Extracts a human readable message from an error body.
///
/// Looks at `error` (string, or object with `message`) and then `message`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(message)) => return Some(message.clone()),
        Some(Value::Object(obj)) => {
            if let Some(Value::String(message)) = obj.get("message") {
                return Some(message.clone());
            }
        }
        _ => {}
    }
    body.get("message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

/// Unwraps a successful (2xx) envelope.
///
/// Returns `{data, meta}` when metadata is present, otherwise `data` alone.
pub(crate) fn unwrap(status: u16, body: Value) -> Result<Value> {
    let Ok(envelope) = Envelope::deserialize(&body) else {
        return Err(Error::api("Invalid response envelope", status, Some(body)));
    };

    if !envelope.success {
        let message = error_message(&body).unwrap_or_else(|| "Request failed".to_string());
        return Err(Error::api(message, status, Some(body)));
    }

    // `"data": null` is a valid payload; only an absent key is an error.
    let Some(data) = body.get("data").cloned() else {
        return Err(Error::api("Response is missing data", status, Some(body)));
    };

    Ok(match envelope.meta {
        Some(meta) => serde_json::json!({ "data": data, "meta": meta }),
        None => data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod unwrap {
        use super::*;

        #[test]
        fn single_resource_unwraps_to_data() {
            let body = json!({"success": true, "data": {"id": "a1", "status": "active"}});
            let value = unwrap(200, body).unwrap();
            assert_eq!(value, json!({"id": "a1", "status": "active"}));
        }

        #[test]
        fn meta_is_preserved_alongside_data() {
            let body = json!({
                "success": true,
                "data": [{"id": "a1"}],
                "meta": {"pagination": {"page": 1, "limit": 10, "total": 1, "total_pages": 1}}
            });
            let value = unwrap(200, body).unwrap();
            assert_eq!(value["data"], json!([{"id": "a1"}]));
            assert_eq!(value["meta"]["pagination"]["total"], json!(1));
        }

        #[test]
        fn explicit_null_data_is_accepted() {
            let value = unwrap(200, json!({"success": true, "data": null})).unwrap();
            assert_eq!(value, Value::Null);
        }

        #[test]
        fn missing_data_is_an_api_error() {
            let err = unwrap(200, json!({"success": true})).unwrap_err();
            assert_eq!(err.status_code(), Some(200));
            assert_eq!(err.to_string(), "Response is missing data");
        }

        #[test]
        fn unsuccessful_envelope_uses_error_message() {
            let err = unwrap(200, json!({"success": false, "error": "Alert limit reached"}))
                .unwrap_err();
            assert!(matches!(err, Error::Api { status: 200, .. }));
            assert_eq!(err.to_string(), "Alert limit reached");
        }

        #[test]
        fn non_envelope_body_is_rejected() {
            let err = unwrap(200, json!([1, 2, 3])).unwrap_err();
            assert_eq!(err.to_string(), "Invalid response envelope");
        }
    }

    mod messages {
        use super::*;

        #[test]
        fn string_error() {
            assert_eq!(
                error_message(&json!({"error": "Not found"})).as_deref(),
                Some("Not found")
            );
        }

        #[test]
        fn object_error_with_message() {
            let body = json!({"error": {"code": "E42", "message": "Symbol not supported"}});
            assert_eq!(error_message(&body).as_deref(), Some("Symbol not supported"));
        }

        #[test]
        fn top_level_message_fallback() {
            assert_eq!(
                error_message(&json!({"message": "Server busy"})).as_deref(),
                Some("Server busy")
            );
        }

        #[test]
        fn absent_message() {
            assert_eq!(error_message(&json!({"success": false})), None);
        }
    }

    mod paginated {
        use super::*;

        #[test]
        fn decodes_data_and_meta() {
            let value = json!({
                "data": [1, 2],
                "meta": {"pagination": {"page": 1, "limit": 2, "total": 5, "totalPages": 3}}
            });
            let page: Paginated<u32> = Paginated::from_value(value).unwrap();

            assert_eq!(page.data, vec![1, 2]);
            let pagination = page.pagination().unwrap();
            assert_eq!(pagination.total_pages, 3);
            assert!(pagination.has_next());
        }

        #[test]
        fn bare_array_has_no_pagination() {
            let page: Paginated<u32> = Paginated::from_value(json!([4, 5])).unwrap();
            assert_eq!(page.data, vec![4, 5]);
            assert!(page.pagination().is_none());
        }

        #[test]
        fn last_page_has_no_next() {
            let pagination = Pagination {
                page: 3,
                limit: 2,
                total: 5,
                total_pages: 3,
            };
            assert!(!pagination.has_next());
        }

        #[test]
        fn wrong_shape_is_a_decode_error() {
            let err = Paginated::<u32>::from_value(json!({"data": "nope"})).unwrap_err();
            assert!(!err.is_retryable());
        }
    }
}
