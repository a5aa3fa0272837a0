//! Backend Connection Module
//!
//! The seam between the cache store and a concrete key-value backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::memory::MemoryStore;
use crate::cache::redis_store::RedisConnection;
use crate::error::{CacheError, Result};

/// Scheme selecting the in-process backend.
pub const MEMORY_SCHEME: &str = "memory://";

/// A live connection shared by every namespace.
///
/// `db` is the namespace partition index; implementations must keep
/// partitions isolated from each other.
#[async_trait]
pub trait StoreConnection: Send + Sync {
    /// Reads a payload, `None` when absent or expired.
    async fn get(&self, db: u32, key: &str) -> Result<Option<Vec<u8>>>;

    /// Writes a payload, replacing any existing value and its TTL.
    async fn set(&self, db: u32, key: &str, payload: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Removes a key, returning whether it existed.
    async fn delete(&self, db: u32, key: &str) -> Result<bool>;

    /// Removes every key in the partition.
    async fn flush(&self, db: u32) -> Result<()>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Opens connections from a connection string.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn StoreConnection>>;
}

// == Default Connector ==
/// Chooses the backend from the connection string scheme.
///
/// - `memory://` hands out this connector's [`MemoryStore`]
/// - `redis://` and `rediss://` open a multiplexed Redis connection
#[derive(Debug, Default, Clone)]
pub struct DefaultConnector {
    memory: Arc<MemoryStore>,
}

impl DefaultConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store `memory://` connections resolve to, for purging expired entries.
    pub fn memory_store(&self) -> Arc<MemoryStore> {
        self.memory.clone()
    }
}

#[async_trait]
impl Connector for DefaultConnector {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn StoreConnection>> {
        let connection_string = connection_string.trim();

        if connection_string.starts_with(MEMORY_SCHEME) {
            return Ok(self.memory.clone());
        }

        if connection_string.starts_with("redis://") || connection_string.starts_with("rediss://") {
            let connection = RedisConnection::open(connection_string).await?;
            return Ok(Arc::new(connection));
        }

        Err(CacheError::unavailable(format!(
            "unsupported connection string scheme: {}",
            connection_string.split("://").next().unwrap_or_default()
        )))
    }
}
