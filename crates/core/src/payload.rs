//! Helpers for pulling typed values out of loosely-typed JSON request bodies.
//!
//! Create endpoints check for the *presence* of every required key first (so
//! the first missing one can be named in the 400), then read each value with
//! the accessor matching its column type.

use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use crate::dates::{parse_date, parse_time};
use crate::error::CoreError;
use crate::types::DbId;

/// A JSON object body.
pub type Object = Map<String, Value>;

/// Fail with [`CoreError::MissingField`] naming the first absent key.
pub fn require_fields(obj: &Object, fields: &[&str]) -> Result<(), CoreError> {
    match fields.iter().find(|f| !obj.contains_key(**f)) {
        Some(missing) => Err(CoreError::MissingField((*missing).to_string())),
        None => Ok(()),
    }
}

/// Read a value as text. Numbers and booleans are stringified; `null` and
/// absent keys yield `None`.
pub fn optional_text(obj: &Object, key: &str) -> Result<Option<String>, CoreError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(CoreError::Validation(format!("{key} must be a string"))),
    }
}

/// Read a value as text, treating `null`/absent as the empty string.
pub fn text_or_empty(obj: &Object, key: &str) -> Result<String, CoreError> {
    Ok(optional_text(obj, key)?.unwrap_or_default())
}

/// Read a required date.
pub fn required_date(obj: &Object, key: &str) -> Result<NaiveDate, CoreError> {
    match optional_text(obj, key)? {
        Some(s) if !s.trim().is_empty() => parse_date(key, &s),
        _ => Err(CoreError::Validation(format!("{key} must not be empty"))),
    }
}

/// Read an optional date; `null`, absent and `""` are `None`.
pub fn optional_date(obj: &Object, key: &str) -> Result<Option<NaiveDate>, CoreError> {
    match optional_text(obj, key)? {
        Some(s) if !s.trim().is_empty() => parse_date(key, &s).map(Some),
        _ => Ok(None),
    }
}

/// Read a required time of day.
pub fn required_time(obj: &Object, key: &str) -> Result<NaiveTime, CoreError> {
    match optional_text(obj, key)? {
        Some(s) if !s.trim().is_empty() => parse_time(key, &s),
        _ => Err(CoreError::Validation(format!("{key} must not be empty"))),
    }
}

/// Read an optional time of day; `null`, absent and `""` are `None`.
pub fn optional_time(obj: &Object, key: &str) -> Result<Option<NaiveTime>, CoreError> {
    match optional_text(obj, key)? {
        Some(s) if !s.trim().is_empty() => parse_time(key, &s).map(Some),
        _ => Ok(None),
    }
}

/// Read an id given either as a JSON number or a numeric string.
pub fn optional_id(obj: &Object, key: &str) -> Result<Option<DbId>, CoreError> {
    let invalid = || CoreError::Validation(format!("{key} must be an integer id"));
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn obj(v: Value) -> Object {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn names_first_missing_field_in_declared_order() {
        let body = obj(json!({ "staff": "Ama", "reason": "patching" }));
        let err = require_fields(&body, &["staff", "date", "time_in", "reason"]).unwrap_err();
        assert_matches!(err, CoreError::MissingField(ref f) if f == "date");
        assert_eq!(err.to_string(), "missing field date");
    }

    #[test]
    fn present_null_counts_as_present() {
        let body = obj(json!({ "time_out": null }));
        assert!(require_fields(&body, &["time_out"]).is_ok());
    }

    #[test]
    fn text_accessors_coerce_scalars() {
        let body = obj(json!({ "a": "x", "b": 7, "c": null, "d": [1] }));
        assert_eq!(optional_text(&body, "a").unwrap().as_deref(), Some("x"));
        assert_eq!(optional_text(&body, "b").unwrap().as_deref(), Some("7"));
        assert_eq!(optional_text(&body, "c").unwrap(), None);
        assert_eq!(text_or_empty(&body, "missing").unwrap(), "");
        assert!(optional_text(&body, "d").is_err());
    }

    #[test]
    fn blank_optional_time_is_none() {
        let body = obj(json!({ "time_out": "", "time_in": "09:15" }));
        assert_eq!(optional_time(&body, "time_out").unwrap(), None);
        assert_eq!(
            required_time(&body, "time_in").unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert!(required_time(&body, "time_out").is_err());
    }

    #[test]
    fn malformed_date_names_the_field() {
        let body = obj(json!({ "date": "yesterday" }));
        let err = required_date(&body, "date").unwrap_err();
        assert!(err.to_string().contains("date must be a date"));
    }

    #[test]
    fn ids_accept_numbers_and_digit_strings() {
        let body = obj(json!({ "a": 12, "b": " 40 ", "c": "abc", "d": "" }));
        assert_eq!(optional_id(&body, "a").unwrap(), Some(12));
        assert_eq!(optional_id(&body, "b").unwrap(), Some(40));
        assert!(optional_id(&body, "c").is_err());
        assert_eq!(optional_id(&body, "d").unwrap(), None);
    }
}
