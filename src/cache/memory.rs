//! In-Process Backend Module
//!
//! Partitioned HashMap storage with TTL expiration, selected by `memory://`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::connection::StoreConnection;
use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::error::Result;

type Partition = HashMap<String, CacheEntry>;

// == Memory Store ==
/// In-process key-value storage, one map per namespace partition.
///
/// Expired entries are never returned; they are dropped lazily on access and
/// in bulk by [`MemoryStore::cleanup_expired`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<HashMap<u32, Partition>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from every partition.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut partitions = self.partitions.write().await;

        let mut removed = 0;
        for partition in partitions.values_mut() {
            let before = partition.len();
            partition.retain(|_, entry| !entry.is_expired_at(now));
            removed += before - partition.len();
        }
        removed
    }

    // == Length ==
    /// Total stored entries, expired ones included until purged.
    pub async fn total_entries(&self) -> usize {
        self.partitions.read().await.values().map(HashMap::len).sum()
    }
}

#[async_trait]
impl StoreConnection for MemoryStore {
    async fn get(&self, db: u32, key: &str) -> Result<Option<Vec<u8>>> {
        {
            let partitions = self.partitions.read().await;
            match partitions.get(&db).and_then(|p| p.get(key)) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.payload.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it, re-checking under the write lock in case it was rewritten
        let mut partitions = self.partitions.write().await;
        if let Some(partition) = partitions.get_mut(&db) {
            if partition.get(key).is_some_and(CacheEntry::is_expired) {
                partition.remove(key);
            }
        }
        Ok(None)
    }

    async fn set(&self, db: u32, key: &str, payload: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(payload.to_vec(), ttl);
        self.partitions
            .write()
            .await
            .entry(db)
            .or_default()
            .insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, db: u32, key: &str) -> Result<bool> {
        let removed = self
            .partitions
            .write()
            .await
            .get_mut(&db)
            .and_then(|p| p.remove(key));

        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    async fn flush(&self, db: u32) -> Result<()> {
        self.partitions.write().await.remove(&db);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store.set(0, "key1", b"value1", None).await.unwrap();
        assert_eq!(store.get(0, "key1").await.unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.total_entries().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get(0, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = MemoryStore::new();

        store.set(0, "key1", b"value1", None).await.unwrap();
        store.set(0, "key1", b"value2", None).await.unwrap();

        assert_eq!(store.get(0, "key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.total_entries().await, 1);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryStore::new();

        store.set(0, "key1", b"short", Some(Duration::from_millis(30))).await.unwrap();
        store.set(0, "key1", b"forever", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get(0, "key1").await.unwrap(), Some(b"forever".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();

        store.set(0, "key1", b"value1", None).await.unwrap();
        assert!(store.delete(0, "key1").await.unwrap());
        assert!(!store.delete(0, "key1").await.unwrap());
        assert_eq!(store.get(0, "key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let store = MemoryStore::new();

        store.set(0, "shared", b"auth", None).await.unwrap();
        store.set(1, "shared", b"data", None).await.unwrap();
        store.flush(0).await.unwrap();

        assert_eq!(store.get(0, "shared").await.unwrap(), None);
        assert_eq!(store.get(1, "shared").await.unwrap(), Some(b"data".to_vec()));
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemoryStore::new();

        store.set(1, "key1", b"value1", Some(Duration::from_millis(50))).await.unwrap();
        assert!(store.get(1, "key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(store.get(1, "key1").await.unwrap(), None);
        assert_eq!(store.total_entries().await, 0, "expired entry dropped on read");
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryStore::new();

        store.set(0, "key1", b"value1", Some(Duration::from_millis(50))).await.unwrap();
        store.set(1, "key2", b"value2", Some(Duration::from_secs(10))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.total_entries().await, 1);
        assert!(store.get(1, "key2").await.unwrap().is_some());
    }
}
