//! Error types for schema persistence
//!
//! Provides error handling for:
//! - Local storage backends (memory, file)
//! - Remote schema server reads and writes
//! - Stored document decoding
//! - Configuration loading

use lowcode_request::RequestError;
use std::path::PathBuf;

/// Errors raised by a local storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error while reading or writing an entry
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not valid UTF-8
    #[error("entry '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined persistence error
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Remote request failed
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Local storage failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Stored or exported document could not be (de)serialized
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown persistence target name
    #[error("invalid target: '{0}' (expected 'server' or 'local')")]
    InvalidTarget(String),
}

impl From<toml::de::Error> for PersistError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for persistence operations
pub type PersistResult<T> = Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lowcode_request::HttpFailure;

    #[test]
    fn storage_error_display() {
        let err = StorageError::InvalidUtf8 {
            key: "demo-packages".to_string(),
        };
        assert_eq!(err.to_string(), "entry 'demo-packages' is not valid UTF-8");
    }

    #[test]
    fn error_conversions() {
        let err: PersistError = RequestError::from(HttpFailure::new(500)).into();
        assert!(matches!(err, PersistError::Request(_)));

        let err: PersistError = StorageError::io_error(
            "/tmp/x",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        )
        .into();
        assert!(err.to_string().starts_with("storage error: io error at /tmp/x"));
    }
}
