//! In-process store with Redis string/list semantics
//!
//! Entries carry an absolute expiration in Unix milliseconds (0 = never).
//! Expired entries are removed lazily on the next access to their key.

use super::Store;
use crate::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// Global counter for expired keys removed by lazy expiration
pub static EXPIRED_KEYS_REMOVED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
enum Data {
    Text(Vec<u8>),
    List(VecDeque<Vec<u8>>),
}

#[derive(Debug, Clone)]
struct Entry {
    expire_at: u64,
    data: Data,
}

impl Entry {
    fn new(data: Data) -> Self {
        Self { expire_at: 0, data }
    }

    fn is_expired(&self) -> bool {
        self.expire_at != 0 && current_millis() >= self.expire_at
    }

    fn list_mut(&mut self) -> Option<&mut VecDeque<Vec<u8>>> {
        match &mut self.data {
            Data::List(list) => Some(list),
            Data::Text(_) => None,
        }
    }
}

/// Memory-backed store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn incr_by(&self, key: &str, delta: i64) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock();
        let current = match live(&mut entries, key) {
            Some(Entry {
                data: Data::Text(bytes),
                ..
            }) => parse_integer(bytes)?,
            Some(_) => return Err(StoreError::wrong_type()),
            None => 0,
        };

        let next = current.checked_add(delta).ok_or_else(|| {
            StoreError::Command("ERR increment or decrement would overflow".to_string())
        })?;
        store_keeping_ttl(&mut entries, key, next.to_string().into_bytes());
        Ok(next)
    }

    fn push(&self, key: &str, values: Vec<Vec<u8>>, front: bool) -> Result<i64, StoreError> {
        if values.is_empty() {
            let cmd = if front { "lpush" } else { "rpush" };
            return Err(StoreError::Command(format!(
                "ERR wrong number of arguments for '{cmd}' command"
            )));
        }

        let mut entries = self.entries.lock();
        // an expired list is replaced, not extended
        live(&mut entries, key);
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(Data::List(VecDeque::new())));
        let Some(list) = entry.list_mut() else {
            return Err(StoreError::wrong_type());
        };

        for value in values {
            if front {
                list.push_front(value);
            } else {
                list.push_back(value);
            }
        }
        Ok(to_i64(list.len()))
    }

    fn pop(&self, key: &str, front: bool) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock();
        let Some(entry) = live(&mut entries, key) else {
            return Ok(None);
        };
        let Some(list) = entry.list_mut() else {
            return Err(StoreError::wrong_type());
        };

        let item = if front {
            list.pop_front()
        } else {
            list.pop_back()
        };
        if list.is_empty() {
            entries.remove(key);
        }
        Ok(item)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        trace!(key, "SET");
        self.entries
            .lock()
            .insert(key.to_string(), Entry::new(Data::Text(value)));
        Ok(())
    }

    async fn set_ex(&self, key: &str, seconds: u64, value: Vec<u8>) -> Result<(), StoreError> {
        trace!(key, seconds, "SETEX");
        if seconds == 0 {
            return Err(StoreError::Command(
                "ERR invalid expire time in 'setex' command".to_string(),
            ));
        }
        let entry = Entry {
            expire_at: expire_at_from_now(seconds),
            data: Data::Text(value),
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key) {
            Some(Entry {
                data: Data::Text(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(StoreError::wrong_type()),
            None => Ok(None),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        self.incr_by(key, 1)
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        self.incr_by(key, -1)
    }

    async fn incr_by_float(&self, key: &str, amount: f64) -> Result<f64, StoreError> {
        let mut entries = self.entries.lock();
        let current = match live(&mut entries, key) {
            Some(Entry {
                data: Data::Text(bytes),
                ..
            }) => parse_float(bytes)?,
            Some(_) => return Err(StoreError::wrong_type()),
            None => 0.0,
        };

        let next = current + amount;
        if !next.is_finite() {
            return Err(StoreError::Command(
                "ERR increment would produce NaN or Infinity".to_string(),
            ));
        }
        store_keeping_ttl(&mut entries, key, next.to_string().into_bytes());
        Ok(next)
    }

    async fn lpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
        self.push(key, values, true)
    }

    async fn rpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
        self.push(key, values, false)
    }

    async fn lpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.pop(key, true)
    }

    async fn rpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.pop(key, false)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock();
        let Some(entry) = live(&mut entries, key) else {
            return Ok(Vec::new());
        };
        let Some(list) = entry.list_mut() else {
            return Err(StoreError::wrong_type());
        };

        Ok(match clamp_range(start, stop, to_i64(list.len())) {
            Some((first, last)) => list.range(first..=last).cloned().collect(),
            None => Vec::new(),
        })
    }

    async fn llen(&self, key: &str) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock();
        match live(&mut entries, key) {
            Some(entry) => entry
                .list_mut()
                .map(|list| to_i64(list.len()))
                .ok_or_else(StoreError::wrong_type),
            None => Ok(0),
        }
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock();
        let Some(entry) = live(&mut entries, key) else {
            return Ok(false);
        };
        if seconds == 0 {
            entries.remove(key);
        } else {
            entry.expire_at = expire_at_from_now(seconds);
        }
        Ok(true)
    }
}

/// Look up a key, dropping it first if it has expired
fn live<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
        EXPIRED_KEYS_REMOVED.fetch_add(1, Ordering::Relaxed);
        trace!(key, "Lazy expiration: removed expired key");
        return None;
    }
    entries.get_mut(key)
}

/// Overwrite a string value without touching its expiration (INCR semantics)
fn store_keeping_ttl(entries: &mut HashMap<String, Entry>, key: &str, bytes: Vec<u8>) {
    match entries.get_mut(key) {
        Some(entry) => entry.data = Data::Text(bytes),
        None => {
            entries.insert(key.to_string(), Entry::new(Data::Text(bytes)));
        }
    }
}

fn parse_integer(bytes: &[u8]) -> Result<i64, StoreError> {
    std::str::from_utf8(bytes)
        .ok()
        .filter(|s| !s.starts_with('+'))
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(StoreError::not_integer)
}

fn parse_float(bytes: &[u8]) -> Result<f64, StoreError> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|f| f.is_finite())
        .ok_or_else(StoreError::not_float)
}

/// Resolve LRANGE bounds against a list length; `None` for an empty range
fn clamp_range(start: i64, stop: i64, len: i64) -> Option<(usize, usize)> {
    let start = if start < 0 {
        len.saturating_add(start).max(0)
    } else {
        start
    };
    let stop = if stop < 0 {
        len.saturating_add(stop)
    } else {
        stop.min(len - 1)
    };

    if start > stop || start >= len {
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(stop).ok()?))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn expire_at_from_now(seconds: u64) -> u64 {
    current_millis().saturating_add(seconds.saturating_mul(1000))
}

/// Get the current Unix timestamp in milliseconds
fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
