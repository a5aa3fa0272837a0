//! Cache Entry Module
//!
//! Entries held by the in-process backend.

use std::time::Duration;

use chrono::Utc;

// == Cache Entry ==
/// A stored payload with its expiration metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Protected payload bytes
    pub payload: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` from now, or never.
    pub fn new(payload: Vec<u8>, ttl: Option<Duration>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| now.saturating_add(ttl.as_millis().min(i64::MAX as u128) as i64));

        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiration check against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new(b"payload".to_vec(), None);

        assert_eq!(entry.payload, b"payload");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(b"payload".to_vec(), Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiry_is_ttl_from_now() {
        let before = current_timestamp_ms();
        let entry = CacheEntry::new(Vec::new(), Some(Duration::from_secs(10)));
        let after = current_timestamp_ms();

        let expires = entry.expires_at.unwrap();
        assert!(expires >= before + 10_000 && expires <= after + 10_000);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(Vec::new(), Some(Duration::MAX));

        assert_eq!(entry.expires_at, Some(i64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            payload: Vec::new(),
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - 1));
    }
}
