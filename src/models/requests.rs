//! Request DTOs for the operations API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for `PUT /cache/:namespace/:key`
///
/// # Fields
/// - `value`: Any JSON value except `null`
/// - `ttl`: Optional expiration in seconds (no expiration if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to cache
    #[serde(default)]
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl StoreRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.value.is_null() {
            return Some("Value cannot be null".to_string());
        }
        if self.ttl == Some(0) {
            return Some("TTL must be at least one second".to_string());
        }
        None
    }
}
