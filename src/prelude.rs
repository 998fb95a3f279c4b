//! Prelude module for common imports.
//!
//! # Usage
//!
//! ```ignore
//! use redis_toolbox::prelude::*;
//! ```

// Error types
pub use crate::error::{Result, StoreError, ToolboxError};

// Configuration
pub use crate::config::{Backend, Config, MetricsConfig, SessionConfig, StoreConfig};

// Values and replies
pub use crate::codec::{Decoded, Value};
pub use crate::ops::Reply;

// Store
pub use crate::store::{MemoryStore, RedisStore, Store};

// Dispatch
pub use crate::metrics::Metrics;
pub use crate::session::Session;
pub use crate::tools::{Dispatcher, ToolCall};

// Common external crates
pub use std::sync::Arc;
pub use tracing::{debug, error, info, trace, warn};
