//! Parameter validation helpers.
//!
//! Typed extraction from [`serde_json::Value`] with user-facing error
//! messages returned as [`ToolResult`]s rather than panics.

use quire_core::tools::{ToolResult, error_result};
use serde_json::Value;

/// Extract a required, non-empty string parameter.
pub fn validate_required_string(
    args: &Value,
    param: &str,
    description: &str,
) -> Result<String, ToolResult> {
    match args.get(param) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_) | Value::Null) | None => Err(error_result(format!(
            "Error: missing required parameter: {param} ({description})"
        ))),
        Some(_) => Err(error_result(format!(
            "Error: invalid type for parameter: {param} (expected string)"
        ))),
    }
}

/// Extract a required string parameter that may be empty (file content).
pub fn validate_string_allow_empty(args: &Value, param: &str) -> Result<String, ToolResult> {
    match args.get(param) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(error_result(format!(
            "Error: missing required parameter: {param}"
        ))),
        Some(_) => Err(error_result(format!(
            "Error: invalid type for parameter: {param} (expected string)"
        ))),
    }
}

/// Extract a required non-negative integer parameter. Integral strings
/// (`"6"`) are accepted too.
pub fn validate_required_u32(args: &Value, param: &str) -> Result<u32, ToolResult> {
    let value = match args.get(param) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(Value::Null) | None => {
            return Err(error_result(format!(
                "Error: missing required parameter: {param}"
            )));
        }
        Some(_) => None,
    };
    value
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            error_result(format!(
                "Error: invalid value for parameter: {param} (expected a non-negative integer)"
            ))
        })
}

/// Extract an optional string parameter.
pub fn get_optional_string(args: &Value, param: &str) -> Option<String> {
    args.get(param).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_string() {
        assert_eq!(validate_required_string(&json!({"p": "x"}), "p", "d").unwrap(), "x");
        assert!(validate_required_string(&json!({}), "p", "d").is_err());
        assert!(validate_required_string(&json!({"p": "  "}), "p", "d").is_err());
        let err = validate_required_string(&json!({"p": 1}), "p", "d").unwrap_err();
        assert!(err.content.contains("expected string"));
        assert!(err.is_error());
    }

    #[test]
    fn empty_content_is_allowed() {
        assert_eq!(validate_string_allow_empty(&json!({"c": ""}), "c").unwrap(), "");
        assert!(validate_string_allow_empty(&json!({}), "c").is_err());
    }

    #[test]
    fn integers() {
        assert_eq!(validate_required_u32(&json!({"n": 6}), "n").unwrap(), 6);
        assert_eq!(validate_required_u32(&json!({"n": "7"}), "n").unwrap(), 7);
        assert!(validate_required_u32(&json!({"n": -1}), "n").is_err());
        assert!(validate_required_u32(&json!({"n": 1.5}), "n").is_err());
        assert!(validate_required_u32(&json!({}), "n").is_err());
    }

    #[test]
    fn optional_string() {
        assert_eq!(get_optional_string(&json!({"s": "a"}), "s").as_deref(), Some("a"));
        assert_eq!(get_optional_string(&json!({"s": 1}), "s"), None);
    }
}
