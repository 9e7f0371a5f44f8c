//! Error types for BlogView
//!
//! One enum for every fallible operation in the crate: retrieval,
//! storage and terminal I/O.

use thiserror::Error;

/// Main error type for BlogView operations
#[derive(Error, Debug)]
pub enum BlogViewError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Retrieval(String),

    #[error("Post {0} not found")]
    PostNotFound(u64),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Timed out waiting for {0}")]
    Timeout(String),
}

/// Result type alias for BlogView operations
pub type Result<T> = std::result::Result<T, BlogViewError>;

impl BlogViewError {
    /// Build a storage error from any displayable cause
    pub fn storage(key: &str, cause: impl std::fmt::Display) -> Self {
        BlogViewError::Storage {
            key: key.to_string(),
            message: cause.to_string(),
        }
    }

    /// Check if this error came from fetching posts (surfaced to the user
    /// through the feed's error field rather than aborting anything)
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            BlogViewError::Request { .. }
                | BlogViewError::Status { .. }
                | BlogViewError::Decode { .. }
                | BlogViewError::Retrieval(_)
                | BlogViewError::PostNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_url() {
        let err = BlogViewError::Status {
            url: "https://dummyjson.com/posts".to_string(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("https://dummyjson.com/posts"));
        assert!(err.is_retrieval());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let source = serde_json::from_str::<u64>("{").unwrap_err();
        let err = BlogViewError::Decode {
            url: "https://dummyjson.com/posts".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Malformed response from https://dummyjson.com/posts"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_retrieval());
    }

    #[test]
    fn storage_errors_are_not_retrieval_errors() {
        let err = BlogViewError::storage("scrollMode", "disk full");
        assert_eq!(
            err.to_string(),
            "Storage error for key 'scrollMode': disk full"
        );
        assert!(!err.is_retrieval());
        assert!(!BlogViewError::InvalidKey(String::new()).is_retrieval());
    }
}
