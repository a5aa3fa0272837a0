//! Cache Service Module
//!
//! The public cache API: typed fetch/store/delete/clear per namespace, each
//! with an async and a blocking form.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::cache::blocking::block_on;
use crate::cache::codec::PayloadCodec;
use crate::cache::connection::{Connector, DefaultConnector};
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::cache::store::{CacheStore, StoreHandle};
use crate::cache::CacheNamespace;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::protect::DataProtector;
use crate::telemetry::Telemetry;

// == Cache Service ==
/// Long-lived cache context shared by every caller in the process.
///
/// When no connection string is configured every operation is a no-op: reads
/// report a miss, writes return silently, and no backend is contacted.
/// Transport failures are never swallowed; they surface as
/// [`CacheError::Unavailable`] so callers can choose to degrade.
pub struct CacheService {
    enabled: bool,
    store: CacheStore,
    codec: PayloadCodec,
    telemetry: Arc<dyn Telemetry>,
    stats: StatsRecorder,
}

impl CacheService {
    // == Constructors ==
    /// Service backed by the connector matching the configured scheme.
    pub fn new(config: &Config, protector: Arc<dyn DataProtector>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self::with_connector(config, Arc::new(DefaultConnector::new()), protector, telemetry)
    }

    /// Service backed by a caller-supplied connector.
    pub fn with_connector(
        config: &Config,
        connector: Arc<dyn Connector>,
        protector: Arc<dyn DataProtector>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            enabled: config.is_cache_enabled(),
            store: CacheStore::new(config.connection_string.trim(), connector, telemetry.clone()),
            codec: PayloadCodec::new(protector, config.compression_threshold),
            telemetry,
            stats: StatsRecorder::new(),
        }
    }

    // == State ==
    /// True iff a connection string is configured.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True once the backend connection has been established.
    pub fn is_connected(&self) -> bool {
        self.store.is_connected()
    }

    /// Name of the connected backend, if any.
    pub fn backend(&self) -> Option<&'static str> {
        self.store.backend()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Fetch ==
    /// Reads and decodes the entry at `key`, `None` on a miss or when disabled.
    pub async fn fetch<T: DeserializeOwned>(&self, namespace: CacheNamespace, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        if !self.enabled {
            return Ok(None);
        }

        let handle = self.handle(namespace).await?;
        let payload = self.report(handle.get(key).await)?;

        match payload {
            Some(bytes) => {
                let value = self.codec.decode(&bytes)?;
                self.stats.record_hit();
                debug!(%namespace, key, "cache hit");
                Ok(Some(value))
            }
            None => {
                self.stats.record_miss();
                debug!(%namespace, key, "cache miss");
                Ok(None)
            }
        }
    }

    // == Store ==
    /// Encodes `value` and writes it at `key`, replacing any existing entry.
    ///
    /// `expiration` of `None` keeps the entry until it is deleted or cleared.
    pub async fn store<T: Serialize + ?Sized>(
        &self,
        namespace: CacheNamespace,
        key: &str,
        value: &T,
        expiration: Option<Duration>,
    ) -> Result<()> {
        validate_key(key)?;
        if !self.enabled {
            return Ok(());
        }

        let payload = self.codec.encode(value)?;
        let handle = self.handle(namespace).await?;
        self.report(handle.set(key, &payload, expiration).await)?;

        self.stats.record_write();
        debug!(%namespace, key, bytes = payload.len(), ?expiration, "cache store");
        Ok(())
    }

    // == Delete ==
    /// Removes the entry at `key`. Deleting a missing key succeeds.
    pub async fn delete(&self, namespace: CacheNamespace, key: &str) -> Result<()> {
        validate_key(key)?;
        if !self.enabled {
            return Ok(());
        }

        let handle = self.handle(namespace).await?;
        let existed = self.report(handle.delete(key).await)?;

        self.stats.record_delete();
        debug!(%namespace, key, existed, "cache delete");
        Ok(())
    }

    // == Clear ==
    /// Flushes the whole namespace, including entries other components wrote.
    pub async fn clear(&self, namespace: CacheNamespace) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let handle = self.handle(namespace).await?;
        self.report(handle.flush().await)?;

        self.stats.record_clear();
        debug!(%namespace, "cache clear");
        Ok(())
    }

    // == Blocking Variants ==
    /// Synchronous [`CacheService::fetch`].
    pub fn fetch_blocking<T: DeserializeOwned + Send>(
        &self,
        namespace: CacheNamespace,
        key: &str,
    ) -> Result<Option<T>> {
        block_on(self.fetch(namespace, key))?
    }

    /// Synchronous [`CacheService::store`].
    pub fn store_blocking<T: Serialize + Sync + ?Sized>(
        &self,
        namespace: CacheNamespace,
        key: &str,
        value: &T,
        expiration: Option<Duration>,
    ) -> Result<()> {
        block_on(self.store(namespace, key, value, expiration))?
    }

    /// Synchronous [`CacheService::delete`].
    pub fn delete_blocking(&self, namespace: CacheNamespace, key: &str) -> Result<()> {
        block_on(self.delete(namespace, key))?
    }

    /// Synchronous [`CacheService::clear`].
    pub fn clear_blocking(&self, namespace: CacheNamespace) -> Result<()> {
        block_on(self.clear(namespace))?
    }

    async fn handle(&self, namespace: CacheNamespace) -> Result<StoreHandle> {
        self.report(self.store.get_reference(namespace).await)
    }

    /// Forwards transport failures to telemetry before they propagate.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_unavailable() {
                self.telemetry.track_exception(err);
            }
        }
        result
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("enabled", &self.enabled)
            .field("store", &self.store)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::invalid("key must not be empty"));
    }
    Ok(())
}
