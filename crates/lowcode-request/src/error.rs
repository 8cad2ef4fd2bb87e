//! Error types for the request helper
//!
//! Provides the failure side of the normalization contract:
//! - Status failures carrying `{code, data?}`
//! - Bodies flagged as failed by the server itself
//! - Client-side timeouts
//! - Transport and decoding errors

use serde::Serialize;
use serde_json::Value;

/// Normalized failure record for a mapped HTTP status
///
/// Serializes to `{"code": 404, "data": {...}}`, omitting `data` when the
/// response body could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpFailure {
    /// HTTP status code
    pub code: u16,
    /// Decoded response body, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HttpFailure {
    /// Failure without a body
    #[inline]
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self { code, data: None }
    }

    /// Failure with a decoded body
    #[inline]
    #[must_use]
    pub fn with_data(code: u16, data: Value) -> Self {
        Self {
            code,
            data: Some(data),
        }
    }

    /// Check if status is in the 4xx range
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// Check if status is in the 5xx range
    #[inline]
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.code >= 500
    }
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            Some(data) => write!(f, "HTTP {}: {}", self.code, data),
            None => write!(f, "HTTP {}", self.code),
        }
    }
}

/// Request errors
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Mapped failure status
    #[error("request failed: {0}")]
    Status(HttpFailure),

    /// Success status whose body was falsy or carried `__success: false`
    #[error("request rejected by response body: {0}")]
    Flagged(Value),

    /// Client-side timeout elapsed before the response settled
    #[error("timeout after {after_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds
        after_ms: u64,
    },

    /// Network or transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Success body was not valid JSON
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request could not be built
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    /// Status code of a mapped failure
    #[inline]
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Status(failure) => Some(failure.code),
            _ => None,
        }
    }

    /// Failure record of a mapped failure
    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<&HttpFailure> {
        match self {
            Self::Status(failure) => Some(failure),
            _ => None,
        }
    }

    /// Check if the error is a client-side timeout
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Create transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<HttpFailure> for RequestError {
    fn from(failure: HttpFailure) -> Self {
        Self::Status(failure)
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type alias for request operations
pub type RequestResult<T> = Result<T, RequestError>;
