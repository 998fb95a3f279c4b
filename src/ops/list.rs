//! List operations: push/pop at either end, ranged reads, length

use super::{Reply, failure};
use crate::Result;
use crate::codec::{self, Value};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Left,
    Right,
}

impl End {
    fn as_str(self) -> &'static str {
        match self {
            End::Left => "left",
            End::Right => "right",
        }
    }
}

/// Push onto the head of a list; a list of values keeps its order at the head
pub async fn lpush(store: &dyn Store, name: &str, value: &Value, ttl: Option<u64>) -> Reply {
    push(store, name, value, ttl, End::Left).await
}

/// Append to the tail of a list in input order
pub async fn rpush(store: &dyn Store, name: &str, value: &Value, ttl: Option<u64>) -> Reply {
    push(store, name, value, ttl, End::Right).await
}

async fn push(store: &dyn Store, name: &str, value: &Value, ttl: Option<u64>, end: End) -> Reply {
    match try_push(store, name, value, ttl, end).await {
        Ok(true) => Reply::Done(format!(
            "Value(s) '{value}' pushed to the {} of list '{name}'.",
            end.as_str()
        )),
        Ok(false) => Reply::Done(format!("No values supplied; list '{name}' left unchanged.")),
        Err(e) => failure(format!("Error pushing value(s) to list '{name}'"), &e),
    }
}

/// Returns `false` when there was nothing to push
async fn try_push(
    store: &dyn Store,
    name: &str,
    value: &Value,
    ttl: Option<u64>,
    end: End,
) -> Result<bool> {
    let mut items = codec::encode(value)?.into_items();
    if items.is_empty() {
        return Ok(false);
    }

    match end {
        End::Left => {
            // LPUSH inserts one at a time at the head, reversing its arguments
            items.reverse();
            store.lpush(name, items).await?;
        }
        End::Right => {
            store.rpush(name, items).await?;
        }
    }

    // Not atomic with the push: a failure here leaves the list without expiry
    if let Some(seconds) = ttl.filter(|&seconds| seconds > 0) {
        store.expire(name, seconds).await?;
    }
    Ok(true)
}

pub async fn lpop(store: &dyn Store, name: &str) -> Reply {
    popped(name, store.lpop(name).await)
}

pub async fn rpop(store: &dyn Store, name: &str) -> Reply {
    popped(name, store.rpop(name).await)
}

fn popped(name: &str, result: std::result::Result<Option<Vec<u8>>, crate::StoreError>) -> Reply {
    match result {
        Ok(Some(bytes)) => Reply::from(codec::decode(bytes)),
        Ok(None) => Reply::Absent(empty_or_missing(name)),
        Err(e) => failure(format!("Error popping value from list '{name}'"), &e),
    }
}

/// Items in the inclusive range `[start, stop]` as a JSON array of text
pub async fn lrange(store: &dyn Store, name: &str, start: i64, stop: i64) -> Reply {
    let action = || format!("Error retrieving values from list '{name}'");

    match store.lrange(name, start, stop).await {
        Ok(items) if items.is_empty() => Reply::Absent(empty_or_missing(name)),
        Ok(items) => {
            let texts: Vec<String> = items.iter().map(|item| codec::decode_lossy(item)).collect();
            match serde_json::to_string(&texts) {
                Ok(json) => Reply::Sequence(json),
                Err(e) => failure(action(), &e),
            }
        }
        Err(e) => failure(action(), &e),
    }
}

pub async fn llen(store: &dyn Store, name: &str) -> Reply {
    match store.llen(name).await {
        Ok(n) => Reply::Integer(n),
        Err(e) => failure(format!("Error retrieving length of list '{name}'"), &e),
    }
}

fn empty_or_missing(name: &str) -> String {
    format!("List '{name}' is empty or does not exist.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{CAUSE, FailingStore, RecordingStore};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn values(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    async fn all(store: &dyn Store, name: &str) -> Reply {
        lrange(store, name, 0, -1).await
    }

    #[tokio::test]
    async fn test_lpush_keeps_input_order() {
        let store = MemoryStore::new();
        let reply = lpush(&store, "q", &values(json!(["a", "b", "c"])), None).await;
        assert_eq!(
            reply,
            Reply::Done(r#"Value(s) '["a","b","c"]' pushed to the left of list 'q'."#.into())
        );
        assert_eq!(all(&store, "q").await, Reply::Sequence(r#"["a","b","c"]"#.into()));
    }

    #[tokio::test]
    async fn test_lpush_lands_before_existing() {
        let store = MemoryStore::new();
        rpush(&store, "q", &Value::from("z"), None).await;
        lpush(&store, "q", &values(json!(["a", "b"])), None).await;
        assert_eq!(all(&store, "q").await, Reply::Sequence(r#"["a","b","z"]"#.into()));
    }

    #[tokio::test]
    async fn test_rpush_keeps_input_order() {
        let store = MemoryStore::new();
        rpush(&store, "q", &Value::from("first"), None).await;
        let reply = rpush(&store, "q", &values(json!(["a", "b", "c"])), None).await;
        assert!(matches!(reply, Reply::Done(ref m) if m.contains("to the right of list 'q'")));
        assert_eq!(
            all(&store, "q").await,
            Reply::Sequence(r#"["first","a","b","c"]"#.into())
        );
    }

    #[tokio::test]
    async fn test_push_serializes_objects() {
        let store = MemoryStore::new();
        rpush(&store, "q", &values(json!([{"id": 1}, 2, 2.5])), None).await;
        lpush(&store, "q", &values(json!({"head": true})), None).await;

        assert_eq!(
            all(&store, "q").await,
            Reply::Sequence(r#"["{\"head\":true}","{\"id\":1}","2","2.5"]"#.into())
        );
        assert_eq!(lpop(&store, "q").await, Reply::Text(r#"{"head":true}"#.into()));
    }

    #[tokio::test]
    async fn test_push_empty_list_is_noop() {
        let store = MemoryStore::new();
        let reply = lpush(&store, "q", &Value::List(vec![]), Some(10)).await;
        assert_eq!(
            reply,
            Reply::Done("No values supplied; list 'q' left unchanged.".into())
        );
        assert_eq!(llen(&store, "q").await, Reply::Integer(0));
    }

    #[tokio::test]
    async fn test_push_with_ttl_expires_after_push() {
        let store = RecordingStore::default();
        lpush(&store, "q", &values(json!(["a", "b"])), Some(60)).await;
        rpush(&store, "q", &Value::from("c"), Some(0)).await;
        assert_eq!(store.calls(), vec!["LPUSH q 2", "EXPIRE q 60", "RPUSH q 1"]);
    }

    #[tokio::test]
    async fn test_failed_expire_keeps_pushed_values() {
        let store = RecordingStore::failing_expire();
        let reply = lpush(&store, "q", &values(json!(["a", "b"])), Some(10)).await;
        assert_eq!(
            reply,
            Reply::Failed(format!(
                "Error pushing value(s) to list 'q': Connection error: {CAUSE}"
            ))
        );

        assert_eq!(llen(&store, "q").await, Reply::Integer(2));
        assert_eq!(all(&store, "q").await, Reply::Sequence(r#"["a","b"]"#.into()));
        assert_eq!(
            store.calls(),
            vec!["LPUSH q 2", "EXPIRE q 10", "LLEN q", "LRANGE q 0 -1"]
        );
    }

    #[tokio::test]
    async fn test_push_empty_list_issues_nothing() {
        let store = RecordingStore::default();
        rpush(&store, "q", &Value::List(vec![]), Some(5)).await;
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pop_both_ends() {
        let store = MemoryStore::new();
        rpush(&store, "q", &values(json!(["a", "b", "c"])), None).await;
        assert_eq!(lpop(&store, "q").await, Reply::Text("a".into()));
        assert_eq!(rpop(&store, "q").await, Reply::Text("c".into()));
        assert_eq!(llen(&store, "q").await, Reply::Integer(1));
    }

    #[tokio::test]
    async fn test_pop_missing_is_sentinel() {
        let store = MemoryStore::new();
        let sentinel = Reply::Absent("List 'nope' is empty or does not exist.".into());
        assert_eq!(lpop(&store, "nope").await, sentinel);
        assert_eq!(rpop(&store, "nope").await, sentinel);
        assert_eq!(all(&store, "nope").await, sentinel);
    }

    #[tokio::test]
    async fn test_pop_empty_string_element() {
        let store = MemoryStore::new();
        rpush(&store, "q", &Value::from(""), None).await;
        assert_eq!(lpop(&store, "q").await, Reply::Text(String::new()));
    }

    #[tokio::test]
    async fn test_lrange_bounds() {
        let store = MemoryStore::new();
        rpush(&store, "q", &values(json!(["a", "b", "c", "d"])), None).await;
        assert_eq!(lrange(&store, "q", 1, 2).await, Reply::Sequence(r#"["b","c"]"#.into()));
        assert_eq!(lrange(&store, "q", -2, -1).await, Reply::Sequence(r#"["c","d"]"#.into()));
        assert!(lrange(&store, "q", 5, 9).await.is_absent());
    }

    #[tokio::test]
    async fn test_lrange_binary_items_are_lossy_text() {
        let store = MemoryStore::new();
        rpush(&store, "q", &Value::Bytes(vec![b'a', 0xff]), None).await;
        assert_eq!(all(&store, "q").await, Reply::Sequence("[\"a\u{fffd}\"]".into()));
    }

    #[tokio::test]
    async fn test_llen_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(llen(&store, "nope").await, Reply::Integer(0));
    }

    #[tokio::test]
    async fn test_wrong_type_is_translated() {
        let store = MemoryStore::new();
        crate::ops::set(&store, "s", &Value::from("v"), None).await;
        let reply = lpush(&store, "s", &Value::from("x"), None).await;
        assert_eq!(
            reply,
            Reply::Failed(
                "Error pushing value(s) to list 's': WRONGTYPE Operation against a key holding the wrong kind of value".into()
            )
        );
    }

    #[tokio::test]
    async fn test_failures_never_raise() {
        let store = FailingStore;
        let cases = [
            (lpush(&store, "l", &Value::from("a"), None).await, "Error pushing value(s) to list 'l'"),
            (rpush(&store, "l", &Value::from("a"), Some(3)).await, "Error pushing value(s) to list 'l'"),
            (lpop(&store, "l").await, "Error popping value from list 'l'"),
            (rpop(&store, "l").await, "Error popping value from list 'l'"),
            (lrange(&store, "l", 0, -1).await, "Error retrieving values from list 'l'"),
            (llen(&store, "l").await, "Error retrieving length of list 'l'"),
        ];

        for (reply, action) in cases {
            assert_eq!(
                reply,
                Reply::Failed(format!("{action}: Connection error: {CAUSE}"))
            );
        }
    }
}
