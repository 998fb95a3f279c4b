//! String operations: set/get and atomic counters

use super::{Reply, failure};
use crate::Result;
use crate::codec::{self, Value, format_float};
use crate::store::Store;

/// Set a string value, with an expiration when `ttl` is a positive number of seconds
pub async fn set(store: &dyn Store, key: &str, value: &Value, ttl: Option<u64>) -> Reply {
    let ttl = ttl.filter(|&seconds| seconds > 0);
    match try_set(store, key, value, ttl).await {
        Ok(()) => Reply::Done(match ttl {
            Some(seconds) => format!("Successfully set {key} with expiration {seconds} seconds"),
            None => format!("Successfully set {key}"),
        }),
        Err(e) => failure(format!("Error setting key {key}"), &e),
    }
}

async fn try_set(store: &dyn Store, key: &str, value: &Value, ttl: Option<u64>) -> Result<()> {
    let bytes = codec::encode_one(value)?;
    match ttl {
        Some(seconds) => store.set_ex(key, seconds, bytes).await?,
        None => store.set(key, bytes).await?,
    }
    Ok(())
}

/// Get a string value; an absent key yields a sentinel, never empty text
pub async fn get(store: &dyn Store, key: &str) -> Reply {
    match store.get(key).await {
        Ok(Some(bytes)) => Reply::from(codec::decode(bytes)),
        Ok(None) => Reply::Absent(format!("Key {key} does not exist")),
        Err(e) => failure(format!("Error retrieving key {key}"), &e),
    }
}

pub async fn incr(store: &dyn Store, key: &str) -> Reply {
    match store.incr(key).await {
        Ok(n) => Reply::Done(format!("Key {key} incremented to {n}")),
        Err(e) => failure(format!("Error incrementing key {key}"), &e),
    }
}

pub async fn decr(store: &dyn Store, key: &str) -> Reply {
    match store.decr(key).await {
        Ok(n) => Reply::Done(format!("Key {key} decremented to {n}")),
        Err(e) => failure(format!("Error decrementing key {key}"), &e),
    }
}

pub async fn incrbyfloat(store: &dyn Store, key: &str, amount: f64) -> Reply {
    match store.incr_by_float(key, amount).await {
        Ok(v) => Reply::Done(format!(
            "Key {key} incremented by {}, new value: {}",
            format_float(amount),
            format_float(v)
        )),
        Err(e) => failure(format!("Error incrementing key {key} by float"), &e),
    }
}

/// `amount` is a magnitude; it is negated before the increment
pub async fn decrbyfloat(store: &dyn Store, key: &str, amount: f64) -> Reply {
    match store.incr_by_float(key, -amount).await {
        Ok(v) => Reply::Done(format!(
            "Key {key} decremented by {}, new value: {}",
            format_float(amount),
            format_float(v)
        )),
        Err(e) => failure(format!("Error decrementing key {key} by float"), &e),
    }
}
