//! Lenient field extraction from loosely-typed JSON objects
//!
//! Upstream rows are not consistent about naming (`tc_id` vs `tcId`) or about
//! value types (numbers where strings are expected, `null` for absent). Each
//! helper takes an ordered list of candidate keys and uses the first one that
//! is present and not `null`.

use serde_json::{Map, Value};

/// First non-null value among `keys`
pub(crate) fn first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Scalar rendered as text: strings verbatim, numbers and booleans via display
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text field, empty when absent
pub(crate) fn text(map: &Map<String, Value>, keys: &[&str]) -> String {
    opt_text(map, keys).unwrap_or_default()
}

/// Optional text field
pub(crate) fn opt_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first(map, keys).and_then(scalar_text)
}

/// Field that should hold JSON text but may arrive already decoded
///
/// Strings are kept as-is (they may or may not be valid JSON); any other
/// value is stored as its compact JSON encoding.
pub(crate) fn json_text(map: &Map<String, Value>, keys: &[&str]) -> String {
    match first(map, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
