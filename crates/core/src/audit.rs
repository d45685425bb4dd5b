//! Audit log vocabulary and helpers for building entry payloads.

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Known values of `audit_logs.action`.
pub mod actions {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
    pub const SYNC: &str = "sync";

    pub const ALL: &[&str] = &[CREATE, UPDATE, DELETE, SYNC];
}

/// Known values of `audit_logs.model_name`.
pub mod models {
    pub const FAULT_REPORT: &str = "FaultReport";
    pub const FAULT_FEEDBACK: &str = "FaultFeedback";
    pub const STAFF: &str = "Staff";
    pub const USER: &str = "User";
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Keys whose values never reach the audit table.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "token", "secret", "refresh", "access"];

const REDACTED: &str = "[REDACTED]";

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry,
/// recursing into nested objects and arrays.
pub fn redact_sensitive_fields(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let lower = key.to_lowercase();
                    if SENSITIVE_FIELDS.iter().any(|f| lower.contains(f)) {
                        (key.clone(), Value::String(REDACTED.into()))
                    } else {
                        (key.clone(), redact_sensitive_fields(val))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_fields).collect()),
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Change sets
// ---------------------------------------------------------------------------

/// Builder for the `changes` JSON map of an audit entry.
#[derive(Debug, Default, Clone)]
pub struct Changes(Map<String, Value>);

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Record a `{"from", "to"}` pair, only when the value actually changed.
    pub fn diff<T>(mut self, key: &str, from: T, to: T) -> Self
    where
        T: PartialEq + Into<Value>,
    {
        if from != to {
            let mut pair = Map::new();
            pair.insert("from".into(), from.into());
            pair.insert("to".into(), to.into());
            self.0.insert(key.to_string(), Value::Object(pair));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The finished map with sensitive values redacted.
    pub fn into_value(self) -> Value {
        redact_sensitive_fields(&Value::Object(self.0))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn redacts_nested_sensitive_keys() {
        let input = json!({
            "username": "ama",
            "password": "hunter22",
            "meta": { "refresh_token": "abc", "ip": "10.0.0.1" },
            "list": [{ "secret": 1 }]
        });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["username"], "ama");
        assert_eq!(out["password"], "[REDACTED]");
        assert_eq!(out["meta"]["refresh_token"], "[REDACTED]");
        assert_eq!(out["meta"]["ip"], "10.0.0.1");
        assert_eq!(out["list"][0]["secret"], "[REDACTED]");
    }

    #[test]
    fn key_match_is_case_insensitive() {
        let out = redact_sensitive_fields(&json!({ "NewPassword": "x" }));
        assert_eq!(out["NewPassword"], "[REDACTED]");
    }

    #[test]
    fn diff_skips_unchanged_values() {
        let changes = Changes::new()
            .diff("status", "open", "resolved")
            .diff("resolution_remarks", "", "");
        let value = changes.into_value();
        assert_eq!(value, json!({ "status": { "from": "open", "to": "resolved" } }));
    }

    #[test]
    fn set_values_are_redacted_on_output() {
        let value = Changes::new()
            .set("username", "kofi")
            .set("password", "plain")
            .into_value();
        assert_eq!(value, json!({ "username": "kofi", "password": "[REDACTED]" }));
    }

    #[test]
    fn empty_builder() {
        assert!(Changes::new().is_empty());
        assert!(!Changes::new().set("a", 1).is_empty());
    }
}
