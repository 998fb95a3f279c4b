//! Store layer: the primitives the tools issue against the backing store

mod memory;
mod redis;

pub use memory::{EXPIRED_KEYS_REMOVED, MemoryStore};
pub use self::redis::RedisStore;

use crate::StoreError;
use crate::config::{Backend, StoreConfig};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Handle to a string/list store with Redis command semantics
///
/// Every method is one store round trip. Implementations must be safe to
/// call concurrently; callers add no synchronization of their own.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Check the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// SET: replace the value and clear any expiration
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// SETEX: set the value and its expiration atomically
    async fn set_ex(&self, key: &str, seconds: u64, value: Vec<u8>) -> Result<(), StoreError>;

    /// GET: `None` when the key does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn incr(&self, key: &str) -> Result<i64, StoreError>;

    async fn decr(&self, key: &str) -> Result<i64, StoreError>;

    /// INCRBYFLOAT: `amount` may be negative
    async fn incr_by_float(&self, key: &str, amount: f64) -> Result<f64, StoreError>;

    /// LPUSH: each value is inserted at the head in turn; returns the new length
    async fn lpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError>;

    /// RPUSH: values are appended in order; returns the new length
    async fn rpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError>;

    async fn lpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn rpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// LRANGE: inclusive bounds, negative indices count from the tail
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>, StoreError>;

    /// LLEN: 0 for a missing key
    async fn llen(&self, key: &str) -> Result<i64, StoreError>;

    /// EXPIRE: `false` when the key does not exist
    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError>;
}

/// Open the configured store
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        Backend::Redis => {
            let store = RedisStore::connect(&config.url).await?;
            Ok(Arc::new(store))
        }
        Backend::Memory => {
            info!("Using in-process memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
