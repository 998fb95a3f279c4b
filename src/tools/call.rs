//! Tool call decoding and the tool catalog

use crate::codec::Value;
use serde::{Deserialize, Serialize};

/// A decoded tool invocation
///
/// Wire form: `{"tool": "<name>", "arguments": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "lowercase")]
pub enum ToolCall {
    Set {
        key: String,
        value: Value,
        #[serde(default)]
        expiration: Option<u64>,
    },
    Get {
        key: String,
    },
    Incr {
        key: String,
    },
    Decr {
        key: String,
    },
    Incrbyfloat {
        key: String,
        amount: f64,
    },
    Decrbyfloat {
        key: String,
        amount: f64,
    },
    Lpush {
        name: String,
        value: Value,
        #[serde(default)]
        expire: Option<u64>,
    },
    Rpush {
        name: String,
        value: Value,
        #[serde(default)]
        expire: Option<u64>,
    },
    Lpop {
        name: String,
    },
    Rpop {
        name: String,
    },
    Lrange {
        name: String,
        start: i64,
        stop: i64,
    },
    Llen {
        name: String,
    },
    #[serde(rename = "list_tools")]
    ListTools,
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::Set { .. } => "set",
            ToolCall::Get { .. } => "get",
            ToolCall::Incr { .. } => "incr",
            ToolCall::Decr { .. } => "decr",
            ToolCall::Incrbyfloat { .. } => "incrbyfloat",
            ToolCall::Decrbyfloat { .. } => "decrbyfloat",
            ToolCall::Lpush { .. } => "lpush",
            ToolCall::Rpush { .. } => "rpush",
            ToolCall::Lpop { .. } => "lpop",
            ToolCall::Rpop { .. } => "rpop",
            ToolCall::Lrange { .. } => "lrange",
            ToolCall::Llen { .. } => "llen",
            ToolCall::ListTools => "list_tools",
        }
    }
}

/// Catalog entry describing one tool
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub arguments: &'static [&'static str],
    pub description: &'static str,
}

pub const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "set",
        arguments: &["key", "value", "expiration?"],
        description: "Set a string value with an optional expiration time in seconds.",
    },
    ToolInfo {
        name: "get",
        arguments: &["key"],
        description: "Get a string value.",
    },
    ToolInfo {
        name: "incr",
        arguments: &["key"],
        description: "Increment the integer value of a key by one.",
    },
    ToolInfo {
        name: "decr",
        arguments: &["key"],
        description: "Decrement the integer value of a key by one.",
    },
    ToolInfo {
        name: "incrbyfloat",
        arguments: &["key", "amount"],
        description: "Increment the float value of a key by the given amount.",
    },
    ToolInfo {
        name: "decrbyfloat",
        arguments: &["key", "amount"],
        description: "Decrement the float value of a key by the given amount.",
    },
    ToolInfo {
        name: "lpush",
        arguments: &["name", "value", "expire?"],
        description: "Push one or more values onto the left of a list, keeping their order, \
                      and optionally set an expiration time.",
    },
    ToolInfo {
        name: "rpush",
        arguments: &["name", "value", "expire?"],
        description: "Push one or more values onto the right of a list and optionally set an \
                      expiration time.",
    },
    ToolInfo {
        name: "lpop",
        arguments: &["name"],
        description: "Remove and return the first element of a list.",
    },
    ToolInfo {
        name: "rpop",
        arguments: &["name"],
        description: "Remove and return the last element of a list.",
    },
    ToolInfo {
        name: "lrange",
        arguments: &["name", "start", "stop"],
        description: "Get list elements in an inclusive index range as a JSON array.",
    },
    ToolInfo {
        name: "llen",
        arguments: &["name"],
        description: "Get the length of a list.",
    },
];
