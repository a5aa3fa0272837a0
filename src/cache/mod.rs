//! Cache Module
//!
//! Namespaced, encrypted object cache over a lazily-connected backend.

mod blocking;
mod codec;
mod connection;
mod entry;
mod memory;
mod namespace;
mod redis_store;
mod service;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use blocking::block_on;
pub use codec::PayloadCodec;
pub use connection::{Connector, DefaultConnector, StoreConnection, MEMORY_SCHEME};
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use namespace::CacheNamespace;
pub use redis_store::RedisConnection;
pub use service::CacheService;
pub use stats::{CacheStats, StatsRecorder};
pub use store::{CacheStore, StoreHandle};
