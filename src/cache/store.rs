//! Cache Store Module
//!
//! Owns the single process-wide backend connection and hands out
//! namespace-scoped handles over it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::cache::blocking::block_on;
use crate::cache::connection::{Connector, StoreConnection};
use crate::cache::CacheNamespace;
use crate::error::Result;
use crate::telemetry::Telemetry;

// == Cache Store ==
/// Lazily connects to the backend at most once and memoizes the connection.
///
/// Concurrent first callers wait on the same initialization attempt. A failed
/// attempt leaves nothing memoized, so the next caller tries again.
pub struct CacheStore {
    connection_string: String,
    connector: Arc<dyn Connector>,
    telemetry: Arc<dyn Telemetry>,
    connection: OnceCell<Arc<dyn StoreConnection>>,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(
        connection_string: impl Into<String>,
        connector: Arc<dyn Connector>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            connection_string: connection_string.into(),
            connector,
            telemetry,
            connection: OnceCell::new(),
        }
    }

    // == Get Reference ==
    /// Returns a handle scoped to `namespace`, connecting first if needed.
    ///
    /// No I/O happens once a connection exists. Connection failures surface as
    /// `CacheError::Unavailable`.
    pub async fn get_reference(&self, namespace: CacheNamespace) -> Result<StoreHandle> {
        let connection = self
            .connection
            .get_or_try_init(|| self.connect())
            .await?
            .clone();

        Ok(StoreHandle {
            connection,
            namespace,
        })
    }

    /// Synchronous [`CacheStore::get_reference`].
    pub fn get_reference_blocking(&self, namespace: CacheNamespace) -> Result<StoreHandle> {
        block_on(self.get_reference(namespace))?
    }

    /// True once a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Name of the connected backend, if any.
    pub fn backend(&self) -> Option<&'static str> {
        self.connection.get().map(|c| c.backend())
    }

    async fn connect(&self) -> Result<Arc<dyn StoreConnection>> {
        debug!("Opening cache connection");

        match self.connector.connect(&self.connection_string).await {
            Ok(connection) => {
                info!(backend = connection.backend(), "Cache connection established");
                self.telemetry
                    .track_event("CacheConnected", &[("backend", connection.backend())]);
                Ok(connection)
            }
            Err(err) => {
                warn!(error = %err, "Cache connection failed");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("connected", &self.is_connected())
            .field("backend", &self.backend())
            .finish_non_exhaustive()
    }
}

// == Store Handle ==
/// Namespace-scoped accessor over the shared connection.
#[derive(Clone)]
pub struct StoreHandle {
    connection: Arc<dyn StoreConnection>,
    namespace: CacheNamespace,
}

impl StoreHandle {
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.connection.get(self.namespace.index(), key).await
    }

    pub async fn set(&self, key: &str, payload: &[u8], ttl: Option<Duration>) -> Result<()> {
        self.connection
            .set(self.namespace.index(), key, payload, ttl)
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.connection.delete(self.namespace.index(), key).await
    }

    /// Removes every key in the namespace, whoever wrote it.
    pub async fn flush(&self) -> Result<()> {
        self.connection.flush(self.namespace.index()).await
    }
}
