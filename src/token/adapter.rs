//! Distributed Token Cache Adapter
//!
//! Keeps an in-memory [`TokenCache`] in sync with the `Authentication`
//! namespace of the cache service. Token-acquisition code calls
//! [`TokenCacheHooks::on_before_access`] before it reads the cache and
//! [`TokenCacheHooks::on_after_access`] after every operation.
//!
//! Failures from the cache service are not caught here: a token that fails to
//! persist fails the authentication flow that produced it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{block_on, CacheNamespace, CacheService};
use crate::error::{CacheError, Result};
use crate::token::cache::{TokenCache, TokenCacheState};

/// Notification points a token-acquisition component invokes around its
/// cache reads and writes.
#[async_trait]
pub trait TokenCacheHooks: Send {
    /// Runs immediately before the in-memory cache is read.
    async fn on_before_access(&mut self) -> Result<()>;

    /// Runs after every operation on the in-memory cache.
    async fn on_after_access(&mut self) -> Result<()>;
}

/// Synchronization state of the in-memory cache relative to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// No tokens loaded
    Empty,
    /// Tokens present and in sync with the store
    Loaded,
    /// Tokens changed since the last flush
    Dirty,
}

/// Derives the store key for a principal's tokens for one resource.
pub fn derive_key(resource: &str, object_id: &str) -> String {
    format!("Resource::{}::Identifier::{}", resource, object_id)
}

// == Distributed Token Cache ==
pub struct DistributedTokenCache {
    service: Arc<CacheService>,
    key: String,
    cache: TokenCache,
    state: AdapterState,
}

impl DistributedTokenCache {
    // == Constructors ==
    /// Adapter for a signed-in principal. Adapters for the same resource and
    /// principal share one store entry.
    pub fn for_principal(service: Arc<CacheService>, resource: &str, object_id: &str) -> Result<Self> {
        if resource.is_empty() {
            return Err(CacheError::invalid("resource must not be empty"));
        }
        if object_id.is_empty() {
            return Err(CacheError::invalid("principal object id must not be empty"));
        }
        Self::with_key(service, derive_key(resource, object_id))
    }

    /// Adapter bound to an explicit store key (e.g. app-only contexts).
    pub fn with_key(service: Arc<CacheService>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(CacheError::invalid("token cache key must not be empty"));
        }

        Ok(Self {
            service,
            key,
            cache: TokenCache::new(),
            state: AdapterState::Empty,
        })
    }

    // == Accessors ==
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> AdapterState {
        if self.cache.has_state_changed() {
            AdapterState::Dirty
        } else {
            self.state
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Direct mutable access for token-acquisition code that drives the
    /// hooks itself.
    pub fn cache_mut(&mut self) -> &mut TokenCache {
        &mut self.cache
    }

    // == Access ==
    /// Runs `operation` against the in-memory cache between the two hooks.
    pub async fn access<R, F>(&mut self, operation: F) -> Result<R>
    where
        F: FnOnce(&mut TokenCache) -> R + Send,
    {
        self.on_before_access().await?;
        let result = operation(&mut self.cache);
        self.on_after_access().await?;
        Ok(result)
    }

    // == Clear ==
    /// Drops every in-memory token and flushes the whole `Authentication`
    /// namespace, including other principals' entries.
    pub async fn clear(&mut self) -> Result<()> {
        self.cache.clear();
        self.service.clear(CacheNamespace::Authentication).await?;
        self.cache.mark_persisted();
        self.state = AdapterState::Empty;
        Ok(())
    }

    // == Blocking Variants ==
    /// Synchronous [`TokenCacheHooks::on_before_access`].
    pub fn before_access_blocking(&mut self) -> Result<()> {
        block_on(self.on_before_access())?
    }

    /// Synchronous [`TokenCacheHooks::on_after_access`].
    pub fn after_access_blocking(&mut self) -> Result<()> {
        block_on(self.on_after_access())?
    }

    /// Synchronous [`DistributedTokenCache::clear`].
    pub fn clear_blocking(&mut self) -> Result<()> {
        block_on(self.clear())?
    }
}

#[async_trait]
impl TokenCacheHooks for DistributedTokenCache {
    async fn on_before_access(&mut self) -> Result<()> {
        if self.state != AdapterState::Empty || !self.cache.is_empty() {
            return Ok(());
        }

        let stored: Option<TokenCacheState> = self
            .service
            .fetch(CacheNamespace::Authentication, &self.key)
            .await?;

        if let Some(state) = stored {
            debug!(key = %self.key, tokens = state.entries.len(), "token cache loaded");
            self.cache.restore(state);
            self.state = AdapterState::Loaded;
        }
        Ok(())
    }

    async fn on_after_access(&mut self) -> Result<()> {
        if !self.cache.has_state_changed() {
            return Ok(());
        }

        if self.cache.is_empty() {
            self.service
                .delete(CacheNamespace::Authentication, &self.key)
                .await?;
            self.cache.mark_persisted();
            self.state = AdapterState::Empty;
            debug!(key = %self.key, "token cache emptied");
        } else {
            let snapshot = self.cache.snapshot();
            self.service
                .store(CacheNamespace::Authentication, &self.key, &snapshot, None)
                .await?;
            self.cache.mark_persisted();
            self.state = AdapterState::Loaded;
            debug!(key = %self.key, tokens = snapshot.entries.len(), "token cache persisted");
        }
        Ok(())
    }
}

impl std::fmt::Debug for DistributedTokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedTokenCache")
            .field("key", &self.key)
            .field("state", &self.state())
            .field("tokens", &self.cache.count())
            .finish()
    }
}
