//! Redis Backend Module
//!
//! One multiplexed connection serves every namespace. Commands are pipelined
//! behind a `SELECT` so a shared connection never issues a command against the
//! wrong logical database.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, Client, Pipeline};
use tracing::debug;

use crate::cache::connection::StoreConnection;
use crate::error::Result;

/// Multiplexed Redis connection.
#[derive(Clone)]
pub struct RedisConnection {
    conn: MultiplexedConnection,
}

impl RedisConnection {
    /// Opens the connection. Failures surface as `CacheError::Unavailable`.
    pub async fn open(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)?;
        let conn = client.get_multiplexed_async_connection().await?;

        debug!("Redis connection opened");
        Ok(Self { conn })
    }

    /// Pipeline pre-loaded with the `SELECT` for `db`.
    fn in_db(db: u32) -> Pipeline {
        let mut pipe = redis::pipe();
        pipe.cmd("SELECT").arg(db).ignore();
        pipe
    }
}

#[async_trait]
impl StoreConnection for RedisConnection {
    async fn get(&self, db: u32, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let (payload,): (Option<Vec<u8>>,) = Self::in_db(db)
            .cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        Ok(payload)
    }

    async fn set(&self, db: u32, key: &str, payload: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.conn.clone();
        let mut pipe = Self::in_db(db);
        pipe.cmd("SET").arg(key).arg(payload);
        if let Some(ttl) = ttl {
            pipe.arg("PX").arg(px_millis(ttl));
        }
        pipe.ignore();

        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn delete(&self, db: u32, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let (removed,): (i64,) = Self::in_db(db)
            .cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        Ok(removed > 0)
    }

    async fn flush(&self, db: u32) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = Self::in_db(db)
            .cmd("FLUSHDB")
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// `PX` argument for a TTL: at least 1 ms, saturating at `u64::MAX`.
fn px_millis(ttl: Duration) -> u64 {
    ttl.as_millis().clamp(1, u64::MAX as u128) as u64
}
