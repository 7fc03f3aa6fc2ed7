//! Argument helpers for tools reading model-supplied JSON objects.
//!
//! ```rust
//! use ltooling::{optional_u32, required_string};
//! use serde_json::json;
//!
//! let args = json!({"query": "retrieval", "lesson_number": 2});
//! let args = args.as_object().expect("object");
//!
//! assert_eq!(required_string(args, "query").expect("query"), "retrieval");
//! assert_eq!(optional_u32(args, "lesson_number").expect("lesson"), Some(2));
//! ```

use lprovider::ToolSpec;
use serde_json::{Map, Value};

use crate::ToolError;

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Err(ToolError::invalid_arguments(format!(
            "missing required string: '{key}'"
        ))),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ToolError::invalid_arguments(format!(
            "'{key}' must be a string"
        ))),
    }
}

pub fn optional_string(
    args: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ToolError::invalid_arguments(format!(
            "'{key}' must be a string"
        ))),
    }
}

/// Reads a non-negative integer; numeric strings such as `"2"` are accepted.
pub fn optional_u32(args: &Map<String, Value>, key: &str) -> Result<Option<u32>, ToolError> {
    let invalid = || ToolError::invalid_arguments(format!("'{key}' must be a non-negative integer"));

    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(text)) => text.trim().parse::<u32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Names of required parameters that are absent (or `null`), in declaration order.
pub fn missing_required(spec: &ToolSpec, args: &Map<String, Value>) -> Vec<String> {
    spec.required_parameters()
        .filter(|parameter| matches!(args.get(&parameter.name), None | Some(Value::Null)))
        .map(|parameter| parameter.name.clone())
        .collect()
}

pub(crate) fn ensure_required(spec: &ToolSpec, args: &Map<String, Value>) -> Result<(), ToolError> {
    let missing = missing_required(spec, args);
    if missing.is_empty() {
        return Ok(());
    }

    Err(ToolError::invalid_arguments(format!(
        "missing required parameter(s): {}",
        missing.join(", ")
    ))
    .with_tool_name(spec.name.clone()))
}
