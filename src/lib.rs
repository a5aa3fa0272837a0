//! Explorer Cache - distributed response and token cache
//!
//! Namespaced, encrypted object caching over Redis (or an in-process store),
//! plus an adapter that persists an OAuth token cache through it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod protect;
pub mod tasks;
pub mod telemetry;
pub mod token;

pub use api::AppState;
pub use cache::{CacheNamespace, CacheService};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
pub use token::{DistributedTokenCache, TokenCacheHooks};
