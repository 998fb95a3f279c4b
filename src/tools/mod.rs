//! Tool dispatch: routes decoded tool calls to their operations

mod call;

pub use call::{TOOLS, ToolCall, ToolInfo};

use crate::ToolboxError;
use crate::metrics::Metrics;
use crate::ops::{self, Reply};
use crate::store::Store;
use std::sync::Arc;
use tracing::{debug, warn};

/// Routes tool calls to the operation layer over one shared store handle
pub struct Dispatcher {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Decode a JSON request and dispatch it
    pub async fn handle_request(&self, request: &str) -> Reply {
        match serde_json::from_str::<ToolCall>(request) {
            Ok(call) => self.dispatch(call).await,
            Err(e) => self.reject(&ToolboxError::Request(e.to_string())),
        }
    }

    /// Answer a request that never reached an operation
    pub fn reject(&self, err: &ToolboxError) -> Reply {
        self.metrics.rejected_requests.inc();
        warn!(error = %err, "Rejected request");
        Reply::Failed(err.to_string())
    }

    /// Execute a tool call, recording metrics for it
    pub async fn dispatch(&self, call: ToolCall) -> Reply {
        let tool = call.name();
        debug!(tool, "Dispatching tool call");
        self.metrics.tool_calls.with_label_values(&[tool]).inc();

        let timer = self.metrics.tool_latency.start_timer();
        let reply = self.execute(call).await;
        timer.observe_duration();

        if reply.is_failed() {
            self.metrics.failed_replies.inc();
        } else if reply.is_absent() {
            self.metrics.absent_replies.inc();
        }
        reply
    }

    async fn execute(&self, call: ToolCall) -> Reply {
        let store = self.store.as_ref();
        match call {
            ToolCall::Set {
                key,
                value,
                expiration,
            } => ops::set(store, &key, &value, expiration).await,
            ToolCall::Get { key } => ops::get(store, &key).await,
            ToolCall::Incr { key } => ops::incr(store, &key).await,
            ToolCall::Decr { key } => ops::decr(store, &key).await,
            ToolCall::Incrbyfloat { key, amount } => ops::incrbyfloat(store, &key, amount).await,
            ToolCall::Decrbyfloat { key, amount } => ops::decrbyfloat(store, &key, amount).await,
            ToolCall::Lpush {
                name,
                value,
                expire,
            } => ops::lpush(store, &name, &value, expire).await,
            ToolCall::Rpush {
                name,
                value,
                expire,
            } => ops::rpush(store, &name, &value, expire).await,
            ToolCall::Lpop { name } => ops::lpop(store, &name).await,
            ToolCall::Rpop { name } => ops::rpop(store, &name).await,
            ToolCall::Lrange { name, start, stop } => ops::lrange(store, &name, start, stop).await,
            ToolCall::Llen { name } => ops::llen(store, &name).await,
            ToolCall::ListTools => match serde_json::to_string(TOOLS) {
                Ok(json) => Reply::Sequence(json),
                Err(e) => Reply::Failed(format!("Error listing tools: {e}")),
            },
        }
    }
}
