//! Error types for redis-toolbox

use thiserror::Error;

/// Main error type for redis-toolbox
#[derive(Error, Debug)]
pub enum ToolboxError {
    /// Store failures render as the bare cause so translated messages
    /// read `Error setting key k: <cause>` without a second prefix.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Request(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Store layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    /// A command the store rejected (wrong type, not a number, overflow...)
    #[error("{0}")]
    Command(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl StoreError {
    pub(crate) fn wrong_type() -> Self {
        Self::Command("WRONGTYPE Operation against a key holding the wrong kind of value".to_string())
    }

    pub(crate) fn not_integer() -> Self {
        Self::Command("ERR value is not an integer or out of range".to_string())
    }

    pub(crate) fn not_float() -> Self {
        Self::Command("ERR value is not a valid float".to_string())
    }
}

pub type Result<T> = std::result::Result<T, ToolboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_is_transparent() {
        let err = ToolboxError::from(StoreError::not_integer());
        assert_eq!(err.to_string(), "ERR value is not an integer or out of range");
    }

    #[test]
    fn test_request_error_message() {
        let err = ToolboxError::Request("unknown tool `hset`".to_string());
        assert_eq!(err.to_string(), "Invalid request: unknown tool `hset`");
    }
}
