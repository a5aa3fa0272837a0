//! Response DTOs for the operations API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheNamespace, CacheStats};

/// Response body for `GET /cache/:namespace/:key`
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub namespace: CacheNamespace,
    pub key: String,
    pub value: Value,
}

impl FetchResponse {
    pub fn new(namespace: CacheNamespace, key: impl Into<String>, value: Value) -> Self {
        Self {
            namespace,
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache/:namespace/:key`
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    pub namespace: CacheNamespace,
    pub key: String,
}

impl StoreResponse {
    pub fn new(namespace: CacheNamespace, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored in {}", key, namespace),
            namespace,
            key,
        }
    }
}

/// Response body for `DELETE /cache/:namespace/:key`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub namespace: CacheNamespace,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(namespace: CacheNamespace, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted from {}", key, namespace),
            namespace,
            key,
        }
    }
}

/// Response body for `DELETE /cache/:namespace`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub namespace: CacheNamespace,
}

impl ClearResponse {
    pub fn new(namespace: CacheNamespace) -> Self {
        Self {
            message: format!("Namespace '{}' cleared", namespace),
            namespace,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub deletes: u64,
    pub clears: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            deletes: stats.deletes,
            clears: stats.clears,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Whether a cache connection string is configured
    pub cache_enabled: bool,
    /// Whether the backend connection has been established
    pub connected: bool,
    /// Connected backend name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_enabled: bool, connected: bool, backend: Option<&str>) -> Self {
        Self {
            status: "healthy".to_string(),
            cache_enabled,
            connected,
            backend: backend.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_response_serialize() {
        let resp = FetchResponse::new(CacheNamespace::DataStructures, "customer:42", serde_json::json!({"name": "Contoso"}));
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""namespace":"data-structures""#));
        assert!(json.contains("Contoso"));
    }

    #[test]
    fn test_store_and_delete_messages() {
        let stored = StoreResponse::new(CacheNamespace::DataStructures, "my_key");
        assert!(stored.message.contains("my_key"));

        let deleted = DeleteResponse::new(CacheNamespace::Authentication, "my_key");
        assert!(deleted.message.contains("deleted"));
        assert!(deleted.message.contains("authentication"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = StatsResponse::from(CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        });
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy(false, false, None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
        assert!(!json.contains("backend"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
