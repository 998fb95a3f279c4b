//! String and list operations over an injected store handle
//!
//! Every operation contains its own failures: store errors are translated
//! into a `Reply::Failed` message naming the key and the cause, and "no data"
//! outcomes become `Reply::Absent` sentinels. Nothing is raised to the caller.

pub mod list;
pub mod string;

pub use list::{llen, lpop, lpush, lrange, rpop, rpush};
pub use string::{decr, decrbyfloat, get, incr, incrbyfloat, set};

use crate::codec::Decoded;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Outcome of a tool operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Reply {
    /// Confirmation of a write
    Done(String),
    /// Stored value that decoded as UTF-8
    Text(String),
    /// Stored value that is not valid UTF-8, unchanged
    Bytes(Vec<u8>),
    Integer(i64),
    /// JSON array of list items
    Sequence(String),
    /// Informational "no data" sentinel
    Absent(String),
    /// Translated store failure
    Failed(String),
}

impl Reply {
    pub fn is_failed(&self) -> bool {
        matches!(self, Reply::Failed(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Reply::Absent(_))
    }
}

impl From<Decoded> for Reply {
    fn from(decoded: Decoded) -> Self {
        match decoded {
            Decoded::Text(text) => Reply::Text(text),
            Decoded::Bytes(bytes) => Reply::Bytes(bytes),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Done(s)
            | Reply::Text(s)
            | Reply::Sequence(s)
            | Reply::Absent(s)
            | Reply::Failed(s) => f.write_str(s),
            Reply::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Reply::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// Error translator: `"{action}: {cause}"`
fn failure(action: String, cause: &dyn fmt::Display) -> Reply {
    warn!(error = %cause, "{}", action);
    Reply::Failed(format!("{action}: {cause}"))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Store doubles for operation tests

    use crate::StoreError;
    use crate::store::{MemoryStore, Store};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    pub const CAUSE: &str = "connection refused";

    /// Every primitive fails with a connection error
    pub struct FailingStore;

    fn fail<T>() -> Result<T, StoreError> {
        Err(StoreError::Connection(CAUSE.to_string()))
    }

    #[async_trait]
    impl Store for FailingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            fail()
        }
        async fn set(&self, _: &str, _: Vec<u8>) -> Result<(), StoreError> {
            fail()
        }
        async fn set_ex(&self, _: &str, _: u64, _: Vec<u8>) -> Result<(), StoreError> {
            fail()
        }
        async fn get(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
            fail()
        }
        async fn incr(&self, _: &str) -> Result<i64, StoreError> {
            fail()
        }
        async fn decr(&self, _: &str) -> Result<i64, StoreError> {
            fail()
        }
        async fn incr_by_float(&self, _: &str, _: f64) -> Result<f64, StoreError> {
            fail()
        }
        async fn lpush(&self, _: &str, _: Vec<Vec<u8>>) -> Result<i64, StoreError> {
            fail()
        }
        async fn rpush(&self, _: &str, _: Vec<Vec<u8>>) -> Result<i64, StoreError> {
            fail()
        }
        async fn lpop(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
            fail()
        }
        async fn rpop(&self, _: &str) -> Result<Option<Vec<u8>>, StoreError> {
            fail()
        }
        async fn lrange(&self, _: &str, _: i64, _: i64) -> Result<Vec<Vec<u8>>, StoreError> {
            fail()
        }
        async fn llen(&self, _: &str) -> Result<i64, StoreError> {
            fail()
        }
        async fn expire(&self, _: &str, _: u64) -> Result<bool, StoreError> {
            fail()
        }
    }

    /// Memory store that records the primitive issued by each call
    #[derive(Default)]
    pub struct RecordingStore {
        inner: MemoryStore,
        calls: Mutex<Vec<String>>,
        fail_expire: bool,
    }

    impl RecordingStore {
        /// Every primitive works except EXPIRE, which fails like `FailingStore`
        pub fn failing_expire() -> Self {
            Self {
                fail_expire: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().push(call);
        }
    }

    #[async_trait]
    impl Store for RecordingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            self.record("PING".to_string());
            self.inner.ping().await
        }
        async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
            self.record(format!("SET {key}"));
            self.inner.set(key, value).await
        }
        async fn set_ex(&self, key: &str, seconds: u64, value: Vec<u8>) -> Result<(), StoreError> {
            self.record(format!("SETEX {key} {seconds}"));
            self.inner.set_ex(key, seconds, value).await
        }
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.record(format!("GET {key}"));
            self.inner.get(key).await
        }
        async fn incr(&self, key: &str) -> Result<i64, StoreError> {
            self.record(format!("INCR {key}"));
            self.inner.incr(key).await
        }
        async fn decr(&self, key: &str) -> Result<i64, StoreError> {
            self.record(format!("DECR {key}"));
            self.inner.decr(key).await
        }
        async fn incr_by_float(&self, key: &str, amount: f64) -> Result<f64, StoreError> {
            self.record(format!("INCRBYFLOAT {key} {amount}"));
            self.inner.incr_by_float(key, amount).await
        }
        async fn lpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
            self.record(format!("LPUSH {key} {}", values.len()));
            self.inner.lpush(key, values).await
        }
        async fn rpush(&self, key: &str, values: Vec<Vec<u8>>) -> Result<i64, StoreError> {
            self.record(format!("RPUSH {key} {}", values.len()));
            self.inner.rpush(key, values).await
        }
        async fn lpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.record(format!("LPOP {key}"));
            self.inner.lpop(key).await
        }
        async fn rpop(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            self.record(format!("RPOP {key}"));
            self.inner.rpop(key).await
        }
        async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>, StoreError> {
            self.record(format!("LRANGE {key} {start} {stop}"));
            self.inner.lrange(key, start, stop).await
        }
        async fn llen(&self, key: &str) -> Result<i64, StoreError> {
            self.record(format!("LLEN {key}"));
            self.inner.llen(key).await
        }
        async fn expire(&self, key: &str, seconds: u64) -> Result<bool, StoreError> {
            self.record(format!("EXPIRE {key} {seconds}"));
            if self.fail_expire {
                return fail();
            }
            self.inner.expire(key, seconds).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_display() {
        assert_eq!(Reply::Integer(3).to_string(), "3");
        assert_eq!(Reply::Bytes(vec![b'o', b'k']).to_string(), "ok");
        assert_eq!(Reply::Absent("gone".into()).to_string(), "gone");
    }

    #[test]
    fn test_reply_serialization() {
        let json = serde_json::to_string(&Reply::Integer(2)).unwrap();
        assert_eq!(json, r#"{"kind":"integer","data":2}"#);

        let json = serde_json::to_string(&Reply::Failed("boom".into())).unwrap();
        assert_eq!(json, r#"{"kind":"failed","data":"boom"}"#);
    }

    #[test]
    fn test_failure_message() {
        let reply = failure("Error setting key k".to_string(), &"timed out");
        assert_eq!(reply, Reply::Failed("Error setting key k: timed out".into()));
        assert!(reply.is_failed());
        assert!(!reply.is_absent());
    }
}
