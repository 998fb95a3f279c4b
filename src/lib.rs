//! # redis-toolbox
//!
//! String and list data-structure tools over one shared Redis connection.
//!
//! Each tool is a single request/response against the store: values are
//! encoded on the way in, decoded on the way out, and store failures come
//! back as descriptive messages instead of errors.
//!
//! ## Features
//!
//! - Strings: SET (optional TTL), GET, INCR/DECR, INCRBYFLOAT/DECRBYFLOAT
//! - Lists: LPUSH/RPUSH (single or many values, optional TTL), LPOP/RPOP,
//!   LRANGE, LLEN
//! - Values: text, bytes, integers, floats, JSON objects and lists of these
//! - Redis backend and an in-process memory backend with the same semantics
//! - Prometheus metrics and health check endpoints
//!
//! ## Example
//!
//! ```ignore
//! use redis_toolbox::codec::Value;
//! use redis_toolbox::ops;
//! use redis_toolbox::store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! ops::lpush(&store, "queue", &Value::from(vec!["a", "b", "c"]), None).await;
//! let reply = ops::lrange(&store, "queue", 0, -1).await;
//! assert_eq!(reply.to_string(), r#"["a","b","c"]"#);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌────────────┐     ┌──────────┐     ┌─────────┐
//! │ JSON request │────▶│ Dispatcher │────▶│ ops      │────▶│ Store   │
//! │ (one a line) │     │ (metrics)  │     │ + codec  │     │ (Redis) │
//! └──────────────┘     └────────────┘     └──────────┘     └─────────┘
//! ```

// Modules
pub mod codec;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod ops;
pub mod prelude;
pub mod session;
pub mod store;
pub mod tools;

// Re-exports for convenience
pub use error::{Result, StoreError, ToolboxError};
