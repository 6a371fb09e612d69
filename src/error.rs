//! Error taxonomy shared by every layer of the client.

use std::sync::Arc;

use thiserror::Error;

use crate::transport::HttpError;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Discriminator for [`Error`] variants.
///
/// Handy for branching or logging without destructuring the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input violated a contract.
    Validation,
    /// The server rejected the credentials (401).
    Authentication,
    /// The server or the client-side cooldown refused the request (429).
    RateLimit,
    /// Any other API-level failure.
    Api,
    /// Transport failure: timeout, connection, cancellation, unreadable body.
    Network,
}

/// Every failure the client can report.
///
/// `Error` is `Clone` so that callers sharing one deduplicated request
/// each receive the same failure.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Caller-supplied input violates a contract.
    ///
    /// Raised before any network call and never retried.
    #[error("{message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Name of the offending field, when known
        field: Option<&'static str>,
        /// Position of the offending item in a batch
        index: Option<usize>,
    },

    /// The server answered 401.
    #[error("{message}")]
    Authentication {
        /// Human readable description
        message: String,
    },

    /// The server answered 429, or the stored cooldown has not elapsed yet.
    #[error("{message}")]
    RateLimit {
        /// Human readable description
        message: String,
        /// Seconds to wait before the next request to the same origin
        retry_after: u64,
    },

    /// Non-2xx response, non-JSON response, or an unsuccessful envelope.
    #[error("{message}")]
    Api {
        /// Human readable description
        message: String,
        /// HTTP status code
        status: u16,
        /// Raw response body (JSON when parseable, otherwise a string)
        body: Option<serde_json::Value>,
    },

    /// Transport failure.
    #[error("{message}")]
    Network {
        /// Human readable description
        message: String,
        /// Whether another attempt may succeed
        retryable: bool,
        /// Underlying transport error, if any
        #[source]
        source: Option<Arc<HttpError>>,
    },
}

impl Error {
    /// Creates a validation error without field information.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            index: None,
        }
    }

    /// Creates a validation error naming the offending field.
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field),
            index: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limit error with the given wait in seconds.
    #[must_use]
    pub fn rate_limited(retry_after: u64) -> Self {
        Self::RateLimit {
            message: format!("Rate limit exceeded. Retry after {retry_after} seconds"),
            retry_after,
        }
    }

    /// Creates an API error.
    pub fn api(message: impl Into<String>, status: u16, body: Option<serde_json::Value>) -> Self {
        Self::Api {
            message: message.into(),
            status,
            body,
        }
    }

    /// Creates a retryable network error without an underlying source.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            retryable: true,
            source: None,
        }
    }

    /// Creates the error reported when a successful response cannot be decoded.
    ///
    /// Not retryable: the same payload would fail again.
    #[must_use]
    pub fn decode(err: serde_json::Error) -> Self {
        Self::Network {
            message: format!("Failed to decode response: {err}"),
            retryable: false,
            source: None,
        }
    }

    /// Creates the error reported when the caller cancels an operation.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Network {
            message: "Request was cancelled".to_string(),
            retryable: false,
            source: None,
        }
    }

    /// Attaches a batch index to a validation error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_index(self, position: usize) -> Self {
        match self {
            Self::Validation { message, field, .. } => Self::Validation {
                message: format!("Item {position}: {message}"),
                field,
                index: Some(position),
            },
            other => other,
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Api { .. } => ErrorKind::Api,
            Self::Network { .. } => ErrorKind::Network,
        }
    }

    /// HTTP status code associated with this error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::RateLimit { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Validation { .. } | Self::Network { .. } => None,
        }
    }

    /// Seconds to wait before retrying, for rate limit errors.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Returns true if the request engine should try again after this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } => true,
            Self::Network { retryable, .. } => *retryable,
            Self::Validation { .. } | Self::Authentication { .. } | Self::Api { .. } => false,
        }
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        let message = match &err {
            HttpError::Timeout => "Request timed out".to_string(),
            HttpError::Connection(source) => format!("Network request failed: {source}"),
            HttpError::InvalidUrl(reason) => format!("Invalid request URL: {reason}"),
        };
        Self::Network {
            message,
            retryable: err.is_retryable(),
            source: Some(Arc::new(err)),
        }
    }
}
