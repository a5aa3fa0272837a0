//! Token Cache Module
//!
//! Makes an OAuth library's in-memory token cache durable by mirroring it
//! into the `Authentication` cache namespace.

mod adapter;
mod cache;

pub use adapter::{derive_key, AdapterState, DistributedTokenCache, TokenCacheHooks};
pub use cache::{TokenCache, TokenCacheEntry, TokenCacheKey, TokenCacheState, TokenItem};
