//! In-Memory Token Cache
//!
//! The token store an OAuth token-acquisition component reads and writes.
//! It tracks whether it changed since it was last persisted so a decorator
//! can flush it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one cached token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenCacheKey {
    pub authority: String,
    pub resource: String,
    pub client_id: String,
    /// Directory object id of the user, empty for app-only tokens
    pub unique_id: String,
}

/// A cached token and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenItem {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_on: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl TokenItem {
    pub fn is_expired(&self) -> bool {
        self.expires_on <= Utc::now()
    }
}

/// One persisted key/token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheEntry {
    pub key: TokenCacheKey,
    pub item: TokenItem,
}

/// Serialized form of a whole [`TokenCache`]; stored as one cache entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCacheState {
    pub entries: Vec<TokenCacheEntry>,
}

// == Token Cache ==
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    items: BTreeMap<TokenCacheKey, TokenItem>,
    state_changed: bool,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if the contents changed since the last [`TokenCache::mark_persisted`]
    /// or [`TokenCache::restore`].
    pub fn has_state_changed(&self) -> bool {
        self.state_changed
    }

    pub fn mark_persisted(&mut self) {
        self.state_changed = false;
    }

    /// Adds or replaces a token.
    pub fn insert(&mut self, key: TokenCacheKey, item: TokenItem) {
        self.items.insert(key, item);
        self.state_changed = true;
    }

    pub fn get(&self, key: &TokenCacheKey) -> Option<&TokenItem> {
        self.items.get(key)
    }

    /// First unexpired token for a resource/client pair.
    pub fn find(&self, resource: &str, client_id: &str) -> Option<(&TokenCacheKey, &TokenItem)> {
        self.items
            .iter()
            .find(|(key, item)| key.resource == resource && key.client_id == client_id && !item.is_expired())
    }

    pub fn remove(&mut self, key: &TokenCacheKey) -> Option<TokenItem> {
        let removed = self.items.remove(key);
        if removed.is_some() {
            self.state_changed = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.state_changed = true;
        }
        self.items.clear();
    }

    pub fn snapshot(&self) -> TokenCacheState {
        TokenCacheState {
            entries: self
                .items
                .iter()
                .map(|(key, item)| TokenCacheEntry {
                    key: key.clone(),
                    item: item.clone(),
                })
                .collect(),
        }
    }

    /// Replaces the contents with persisted state. Not counted as a change.
    pub fn restore(&mut self, state: TokenCacheState) {
        self.items = state
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.item))
            .collect();
        self.state_changed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn key(resource: &str) -> TokenCacheKey {
        TokenCacheKey {
            authority: "https://login.microsoftonline.com/contoso.onmicrosoft.com".into(),
            resource: resource.into(),
            client_id: "client".into(),
            unique_id: "user-1".into(),
        }
    }

    fn item(token: &str, lifetime: Duration) -> TokenItem {
        TokenItem {
            access_token: token.into(),
            refresh_token: Some(format!("{}-refresh", token)),
            expires_on: Utc::now() + lifetime,
            display_name: None,
        }
    }

    #[test]
    fn test_insert_marks_changed() {
        let mut cache = TokenCache::new();
        assert!(!cache.has_state_changed());

        cache.insert(key("graph"), item("t1", Duration::hours(1)));
        assert!(cache.has_state_changed());
        assert_eq!(cache.count(), 1);

        cache.mark_persisted();
        assert!(!cache.has_state_changed());
    }

    #[test]
    fn test_remove_missing_is_not_a_change() {
        let mut cache = TokenCache::new();
        assert!(cache.remove(&key("graph")).is_none());
        assert!(!cache.has_state_changed());
    }

    #[test]
    fn test_find_skips_expired() {
        let mut cache = TokenCache::new();
        cache.insert(key("graph"), item("stale", Duration::hours(-1)));
        assert!(cache.find("graph", "client").is_none());

        cache.insert(key("graph"), item("fresh", Duration::hours(1)));
        let (_, found) = cache.find("graph", "client").unwrap();
        assert_eq!(found.access_token, "fresh");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cache = TokenCache::new();
        cache.insert(key("graph"), item("t1", Duration::hours(1)));
        cache.insert(key("partner"), item("t2", Duration::hours(1)));

        let json = serde_json::to_string(&cache.snapshot()).unwrap();
        let state: TokenCacheState = serde_json::from_str(&json).unwrap();

        let mut restored = TokenCache::new();
        restored.restore(state);
        assert_eq!(restored.count(), 2);
        assert!(!restored.has_state_changed());
        assert_eq!(restored.get(&key("partner")).unwrap().access_token, "t2");
    }

    #[test]
    fn test_clear_empty_cache_is_not_a_change() {
        let mut cache = TokenCache::new();
        cache.clear();
        assert!(!cache.has_state_changed());
    }
}
