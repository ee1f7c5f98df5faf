//! Field access over untyped source records.
//!
//! The source payload has no schema we control, so records stay as
//! [`serde_json::Value`] and every accessor is total. "Truthy" follows the
//! source's own conventions: absent, `null`, `false`, `0` and `""` are falsy,
//! everything else (including empty arrays and objects) is truthy.

use serde_json::{Number, Value};

/// Whether a raw field counts as present.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text of a field if it is truthy, `None` otherwise.
pub fn text(raw: &Value, key: &str) -> Option<String> {
    let value = raw.get(key);
    if !is_truthy(value) {
        return None;
    }
    value.map(display)
}

/// Render a field the way a string template would: absent fields become
/// `undefined`, JSON null becomes `null`.
pub fn render(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => display(v),
    }
}

/// Parse the external identifier. Integral numbers and decimal-digit strings
/// are accepted; the source publishes ids as strings.
pub fn job_id(raw: &Value) -> Option<i64> {
    match raw.get("id")? {
        Value::Number(n) => number_to_i64(n),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number_to_i64(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Integral floats print without a trailing `.0` (`50000.0` → `50000`).
fn number_text(n: &Number) -> String {
    if n.is_f64() {
        if let Some(i) = number_to_i64(n) {
            return i.to_string();
        }
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness() {
        let rec = json!({
            "zero": 0, "one": 1, "empty": "", "s": "x", "null": null,
            "f": false, "t": true, "arr": [], "obj": {}, "half": 0.5
        });
        for key in ["zero", "empty", "null", "f", "missing"] {
            assert!(!is_truthy(rec.get(key)), "{key} should be falsy");
        }
        for key in ["one", "s", "t", "arr", "obj", "half"] {
            assert!(is_truthy(rec.get(key)), "{key} should be truthy");
        }
    }

    #[test]
    fn text_renders_scalars() {
        let rec = json!({"n": 42, "s": "Acme", "b": true, "empty": ""});
        assert_eq!(text(&rec, "n").as_deref(), Some("42"));
        assert_eq!(text(&rec, "s").as_deref(), Some("Acme"));
        assert_eq!(text(&rec, "b").as_deref(), Some("true"));
        assert_eq!(text(&rec, "empty"), None);
        assert_eq!(text(&rec, "missing"), None);
    }

    #[test]
    fn render_marks_absent_and_null() {
        let rec = json!({"min": 50000.0, "nul": null});
        assert_eq!(render(rec.get("min")), "50000");
        assert_eq!(render(rec.get("nul")), "null");
        assert_eq!(render(rec.get("max")), "undefined");
    }

    #[test]
    fn ids_from_numbers_and_strings() {
        assert_eq!(job_id(&json!({"id": 1092345})), Some(1092345));
        assert_eq!(job_id(&json!({"id": "1092345"})), Some(1092345));
        assert_eq!(job_id(&json!({"id": 12.0})), Some(12));
        assert_eq!(job_id(&json!({"id": 12.5})), None);
        assert_eq!(job_id(&json!({"id": "abc"})), None);
        assert_eq!(job_id(&json!({"id": null})), None);
        assert_eq!(job_id(&json!({})), None);
    }
}
