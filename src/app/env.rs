//! Environment variable helpers for scripts.

use std::env;

use serde_json::Value;

/// Whether `name` is set to something other than an empty string or `"undefined"`.
pub fn env_is_set(name: &str) -> bool {
    matches!(env::var(name), Ok(value) if !value.is_empty() && value != "undefined")
}

/// Value of `name` decoded as JSON, the raw string when it is not JSON, or `default`.
pub fn parse_env(name: &str, default: impl Into<Value>) -> Value {
    if !env_is_set(name) {
        return default.into();
    }
    let raw = env::var(name).unwrap_or_default();
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}
