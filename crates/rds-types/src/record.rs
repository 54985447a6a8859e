pub use serde_json::Value;

use crate::error::{TypeError, TypeResult};

/// A stored record: field name to dynamically-typed value.
///
/// Backed by serde_json's ordered map, so the same content always serializes
/// with the same key order. Identity derivation relies on that.
pub type Record = serde_json::Map<String, Value>;

/// Opaque per-capability configuration (option name to value).
pub type ConfigMap = serde_json::Map<String, Value>;

/// Convert an arbitrary JSON value into a [`Record`].
///
/// Fails unless the value is a mapping.
pub fn into_record(value: Value) -> TypeResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TypeError::NotAMapping(kind_name(&other))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
