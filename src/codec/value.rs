//! Application-level values accepted by the tools

use serde::Deserialize;
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

/// A value supplied by a caller
///
/// Tool arguments arrive as JSON and are converted with `TryFrom<serde_json::Value>`:
/// strings become `Text`, integral numbers `Int`, other numbers `Float`,
/// objects `Object` and arrays `List`. `Bytes` is only reachable from Rust.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonValue")]
pub enum Value {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
    Object(Map<String, JsonValue>),
    List(Vec<Value>),
}

impl Value {
    /// JSON form of the value, used for canonical serialization
    ///
    /// Bytes are rendered lossily as text; non-finite floats become `null`
    /// here, and are refused by the encoder before they reach a store.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(String::from_utf8_lossy(b).into_owned()),
            Value::Int(n) => JsonValue::Number((*n).into()),
            Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Value::Object(map) => JsonValue::Object(map.clone()),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }

    /// Whether a NaN or infinite float occurs anywhere in the value
    pub fn has_non_finite(&self) -> bool {
        match self {
            Value::Float(f) => !f.is_finite(),
            Value::List(items) => items.iter().any(Value::has_non_finite),
            _ => false,
        }
    }
}

/// Textual form of a float that always reads back as a float (`2.0`, not `2`)
pub fn format_float(f: f64) -> String {
    let s = f.to_string();
    if f.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Object(_) | Value::List(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl TryFrom<JsonValue> for Value {
    type Error = String;

    fn try_from(json: JsonValue) -> Result<Self, Self::Error> {
        match json {
            JsonValue::Null => Err("null is not a storable value".to_string()),
            JsonValue::Bool(b) => Ok(Value::Text(b.to_string())),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if n.is_u64() {
                    // Beyond i64: keep the exact digits rather than losing precision
                    Ok(Value::Text(n.to_string()))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| format!("unrepresentable number {n}"))
                }
            }
            JsonValue::String(s) => Ok(Value::Text(s)),
            JsonValue::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            JsonValue::Object(map) => Ok(Value::Object(map)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Map<String, JsonValue>> for Value {
    fn from(map: Map<String, JsonValue>) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(Value::from).collect())
    }
}
