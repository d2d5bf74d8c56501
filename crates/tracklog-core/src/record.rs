//! Safe accessors over untrusted tracking-log records.
//!
//! Records are kept as [`serde_json::Value`]. Lookups return `None` for
//! anything absent so classifiers can skip quietly, and [`RecordExt::require`]
//! turns absence into a [`ExtractError::Shape`] for the few fields a
//! classifier cannot do without.

use serde_json::Value;

use crate::error::{ExtractError, Result};

/// Literal written in place of a missing or empty value.
pub const NONE_SENTINEL: &str = "None";

// ── RecordExt ─────────────────────────────────────────────────────────────────

/// Path-based lookups on a decoded record.
pub trait RecordExt {
    /// Follow `path` through nested objects. Any missing key or non-object
    /// step yields `None`.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    /// Like [`RecordExt::at`] but an absent key is a shape error naming
    /// `field`. An explicit `null` is returned as-is.
    fn require(&self, path: &[&str], field: &'static str) -> Result<&Value>;
}

impl RecordExt for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| node.as_object()?.get(*key))
    }

    fn require(&self, path: &[&str], field: &'static str) -> Result<&Value> {
        self.at(path).ok_or_else(|| ExtractError::missing(field))
    }
}

// ── Truthiness and text coercion ──────────────────────────────────────────────

/// `false` for null, `false`, zero, the empty string and empty containers.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a value as a single output field.
///
/// Strings are written verbatim, numbers and booleans by their JSON text,
/// `null` as [`NONE_SENTINEL`] and containers as compact JSON.
pub fn to_field(value: &Value) -> String {
    match value {
        Value::Null => NONE_SENTINEL.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render an optional value, substituting [`NONE_SENTINEL`] when it is
/// absent or falsy.
pub fn to_field_or_none(value: Option<&Value>) -> String {
    match value {
        Some(v) if is_truthy(v) => to_field(v),
        _ => NONE_SENTINEL.to_string(),
    }
}

// ── Effective event type ──────────────────────────────────────────────────────

/// Resolve the event's classification string.
///
/// A truthy `name` field overrides `event_type`. Returns `None` when the
/// winning field is absent or not a string.
pub fn effective_event_type(record: &Value) -> Option<&str> {
    match record.get("name") {
        Some(name) if is_truthy(name) => name.as_str(),
        _ => record.get("event_type").and_then(Value::as_str),
    }
}

/// `context.user_id` when it is present and truthy.
pub fn user_id(record: &Value) -> Option<&Value> {
    record.at(&["context", "user_id"]).filter(|v| is_truthy(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── at / require ──────────────────────────────────────────────────────────

    #[test]
    fn test_at_nested_path() {
        let record = json!({"context": {"user_id": 7}});
        assert_eq!(record.at(&["context", "user_id"]), Some(&json!(7)));
    }

    #[test]
    fn test_at_missing_and_non_object_steps() {
        let record = json!({"context": "not-an-object", "event": {"a": 1}});
        assert!(record.at(&["context", "user_id"]).is_none());
        assert!(record.at(&["event", "b"]).is_none());
        assert!(record.at(&["nothing"]).is_none());
    }

    #[test]
    fn test_require_reports_field_name() {
        let record = json!({"event": {"submission": {}}});
        let err = record
            .require(&["event", "problem_id"], "event.problem_id")
            .unwrap_err();
        assert!(err.to_string().contains("event.problem_id is missing"));
        assert!(record.require(&["time"], "time").is_err());
    }

    #[test]
    fn test_require_returns_explicit_null() {
        let record = json!({"event": {"problem_id": null}, "time": null});
        assert_eq!(
            record.require(&["event", "problem_id"], "event.problem_id").unwrap(),
            &Value::Null
        );
        assert_eq!(record.require(&["time"], "time").unwrap(), &Value::Null);
    }

    // ── truthiness ────────────────────────────────────────────────────────────

    #[test]
    fn test_is_truthy() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(3), json!("x"), json!([0]), json!({"k": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    // ── to_field ──────────────────────────────────────────────────────────────

    #[test]
    fn test_to_field_scalars() {
        assert_eq!(to_field(&json!("abc")), "abc");
        assert_eq!(to_field(&json!(42)), "42");
        assert_eq!(to_field(&json!(1.5)), "1.5");
        assert_eq!(to_field(&json!(true)), "true");
        assert_eq!(to_field(&json!(null)), "None");
    }

    #[test]
    fn test_to_field_containers_are_compact_json() {
        assert_eq!(to_field(&json!(["a", "b"])), r#"["a","b"]"#);
        assert_eq!(to_field(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_to_field_or_none() {
        assert_eq!(to_field_or_none(None), "None");
        assert_eq!(to_field_or_none(Some(&json!(""))), "None");
        assert_eq!(to_field_or_none(Some(&json!([]))), "None");
        assert_eq!(to_field_or_none(Some(&json!("4"))), "4");
    }

    // ── effective_event_type ──────────────────────────────────────────────────

    #[test]
    fn test_name_overrides_event_type() {
        let record = json!({"name": "edx.video.paused", "event_type": "/some/url"});
        assert_eq!(effective_event_type(&record), Some("edx.video.paused"));
    }

    #[test]
    fn test_event_type_used_when_name_absent_or_empty() {
        let record = json!({"event_type": "problem_check"});
        assert_eq!(effective_event_type(&record), Some("problem_check"));

        let record = json!({"name": "", "event_type": "problem_check"});
        assert_eq!(effective_event_type(&record), Some("problem_check"));

        let record = json!({"name": null, "event_type": "play_video"});
        assert_eq!(effective_event_type(&record), Some("play_video"));
    }

    #[test]
    fn test_effective_event_type_absent() {
        assert_eq!(effective_event_type(&json!({})), None);
        assert_eq!(effective_event_type(&json!({"name": 5, "event_type": "x"})), None);
    }

    // ── user_id ───────────────────────────────────────────────────────────────

    #[test]
    fn test_user_id_requires_truthy_value() {
        assert_eq!(user_id(&json!({"context": {"user_id": 9}})), Some(&json!(9)));
        assert!(user_id(&json!({"context": {"user_id": ""}})).is_none());
        assert!(user_id(&json!({"context": {}})).is_none());
        assert!(user_id(&json!({})).is_none());
    }
}
