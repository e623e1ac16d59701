//! List payload envelopes.
//!
//! List endpoints answer in one of three shapes:
//! - a bare array: `[...]`
//! - `{ "data": [...] }`
//! - `{ "data": { "data": [...] } }` (paginated)
//!
//! Anything else is treated as an empty list.

use serde_json::Value;

/// Pull the item array out of a list payload, or return an empty vec.
pub fn extract_list(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut outer) => match outer.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::warn!("List payload has no array under data.data");
                    Vec::new()
                }
            },
            _ => {
                tracing::warn!("List payload has no data array");
                Vec::new()
            }
        },
        other => {
            tracing::warn!("Unexpected list payload type: {}", type_name(&other));
            Vec::new()
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
