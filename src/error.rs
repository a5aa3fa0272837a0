//! Error types for the cache subsystem
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Boxed transport failure carried by [`CacheError::Unavailable`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// == Cache Error Enum ==
/// Unified error type for the cache subsystem.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller supplied an empty key or an absent value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection or transport failure talking to the backing store
    #[error("Cache unavailable: {0}")]
    Unavailable(#[source] BoxError),

    /// Payload could not be protected or unprotected
    #[error("Protection error: {0}")]
    Protection(String),

    /// Value could not be serialized or deserialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Payload could not be compressed or decompressed
    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// Key not found (HTTP surface only; the service reports misses as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        CacheError::InvalidArgument(message.into())
    }

    /// Wraps a transport failure.
    pub fn unavailable(source: impl Into<BoxError>) -> Self {
        CacheError::Unavailable(source.into())
    }

    /// True for failures callers may treat as "cache empty" and carry on.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CacheError::Unavailable(_))
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Unavailable(Box::new(err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Protection(_)
            | CacheError::Serialization(_)
            | CacheError::Compression(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache subsystem.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_keeps_source() {
        let err = CacheError::unavailable("connection refused");
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::invalid("empty key"), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::unavailable("down"), StatusCode::SERVICE_UNAVAILABLE),
            (CacheError::Protection("bad tag".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
