//! Redis-backed store
//!
//! Holds one multiplexed `ConnectionManager`; each call works on a clone of
//! it, which shares the underlying connection and reconnects on failure.

use super::Store;
use crate::StoreError;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

/// Store backed by an external Redis server
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to the server at `url`
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to {url}: {e}")))?;

        info!("Connected to Redis at {}", url);
        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "SET");
        let mut conn = self.conn();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, value: Vec<u8>) -> Result<(), StoreError> {
        debug!(key, seconds, bytes = value.len(), "SETEX");
        let mut conn = self.conn();
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(key, "GET");
        let mut conn = self.conn();
        Ok(conn.get(key).await?)
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        debug!(key, "INCR");
        let mut conn = self.conn();
        Ok(redis::cmd("INCR").arg(key).query_async(&mut conn).await?)
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        debug!(key, "DECR");
        let mut conn = self.conn();
        Ok(redis::cmd("DECR").arg(key).query_async(&mut conn).await?)
    }

    async fn incr_by_float(&self, key: &str, amount: f64) -> Result<f64, StoreError> {
        debug!(key, amount, "INCRBYFLOAT");
        let mut conn = self.conn();
        Ok(redis::cmd("INCRBYFLOAT")
            .arg(key)
            .arg(amount)
            .query_async(&mut conn)
            .await?)
    }

    async fn lpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
        debug!(key, count = values.len(), "LPUSH");
        let mut conn = self.conn();
        Ok(conn.lpush(key, values).await?)
    }

    async fn rpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
        debug!(key, count = values.len(), "RPUSH");
        let mut conn = self.conn();
        Ok(conn.rpush(key, values).await?)
    }

    async fn lpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(key, "LPOP");
        let mut conn = self.conn();
        Ok(conn.lpop(key, None).await?)
    }

    async fn rpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        debug!(key, "RPOP");
        let mut conn = self.conn();
        Ok(conn.rpop(key, None).await?)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>, StoreError> {
        debug!(key, start, stop, "LRANGE");
        let mut conn = self.conn();
        Ok(redis::cmd("LRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await?)
    }

    async fn llen(&self, key: &str) -> Result<i64, StoreError> {
        debug!(key, "LLEN");
        let mut conn = self.conn();
        Ok(conn.llen(key).await?)
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError> {
        debug!(key, seconds, "EXPIRE");
        let mut conn = self.conn();
        Ok(redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut conn)
            .await?)
    }
}
