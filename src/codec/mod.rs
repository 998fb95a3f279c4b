//! Value encoding/decoding between tool values and store bytes
//!
//! Encoding rules, in priority order:
//! - raw bytes pass through unchanged
//! - objects are serialized to compact JSON (keys sorted)
//! - lists are encoded element-wise, order preserved; a list nested in a
//!   list becomes one JSON element
//! - any other scalar is stored as its text form
//! - a NaN or infinite float, at any depth, is rejected
//!
//! Decoding tries UTF-8 and falls back to the raw bytes. It never parses JSON.

mod value;

pub use value::{Value, format_float};

/// Encoded form of a value, ready for a store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Single(Vec<u8>),
    Many(Vec<Vec<u8>>),
}

impl Payload {
    /// Flatten into the ordered items of a push
    pub fn into_items(self) -> Vec<Vec<u8>> {
        match self {
            Payload::Single(item) => vec![item],
            Payload::Many(items) => items,
        }
    }
}

/// Result of reading bytes back from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text(String),
    Bytes(Vec<u8>),
}

/// Encode a value for storage
pub fn encode(value: &Value) -> Result<Payload, serde_json::Error> {
    match value {
        Value::List(items) => items
            .iter()
            .map(encode_one)
            .collect::<Result<Vec<_>, _>>()
            .map(Payload::Many),
        other => encode_one(other).map(Payload::Single),
    }
}

/// Encode a value as exactly one stored item; a list is serialized whole
pub fn encode_one(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    if value.has_non_finite() {
        return Err(serde::ser::Error::custom(format!(
            "cannot store non-finite float in {value}"
        )));
    }

    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Object(map) => serde_json::to_vec(map),
        Value::List(_) => serde_json::to_vec(&value.to_json()),
        Value::Text(s) => Ok(s.as_bytes().to_vec()),
        Value::Int(_) | Value::Float(_) => Ok(value.to_string().into_bytes()),
    }
}

/// Decode stored bytes: UTF-8 text when valid, otherwise the bytes unchanged
pub fn decode(bytes: Vec<u8>) -> Decoded {
    match String::from_utf8(bytes) {
        Ok(text) => Decoded::Text(text),
        Err(e) => Decoded::Bytes(e.into_bytes()),
    }
}

/// Decode one list item as text for a serialized sequence
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
