//! Shared value primitives used by the model and the checks.
//!
//! Blankness, boolean flag coercion and activation timestamp parsing all
//! follow the lenient conventions wizard documents are authored with.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

// ─── Blankness ──────────────────────────────────────────────────────────────

/// A string is blank when absent, empty, or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// Blankness over an arbitrary attribute value.
///
/// `null`, `false`, blank strings, and empty arrays or objects are blank.
/// Numbers and `true` never are.
pub fn value_is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => false,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Scalar value as a comparable string. Compound values have no scalar form.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ─── Flags ──────────────────────────────────────────────────────────────────

const FALSE_STRINGS: &[&str] = &["0", "f", "false", "off"];

/// Coerce a loosely typed flag value to a boolean.
///
/// Returns `None` when the value has no boolean reading (arrays, objects).
pub fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64() != Some(0.0)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(false);
            }
            let lower = s.to_ascii_lowercase();
            Some(!FALSE_STRINGS.contains(&lower.as_str()))
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

// ─── Timestamps ─────────────────────────────────────────────────────────────

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%.f %z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an absolute activation timestamp into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS ±ZZZZ`, naive date-times
/// (taken as UTC), and bare dates (midnight UTC). Blank input is `None`.
///
/// Deliberately narrower than a free-form date parser: prose forms such as
/// `Jan 1 2099 10:00` are rejected.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
