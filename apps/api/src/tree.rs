//! Structural helpers over `serde_json::Value` trees.
//!
//! `merge` is the single deep-merge used by the preset catalog, the theme
//! normalizer and the onboarding pipeline. Its array policy is a contract:
//! arrays from the source replace the target array wholesale. Elements are
//! copied and never merged positionally or concatenated.

use serde_json::{Map, Value};

/// Deep-merges `source` onto `target`, returning a new tree.
///
/// - non-object `source` → returned as-is
/// - array → replaces the target value
/// - object → merged recursively (a non-object target side counts as `{}`)
/// - any other value (including `null`) → overwrites
///
/// Keys present only in `target` are preserved. Neither input is mutated.
pub fn merge(target: &Value, source: &Value) -> Value {
    let Value::Object(source_map) = source else {
        return source.clone();
    };

    let mut output = match target {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, source_value) in source_map {
        let merged = match source_value {
            Value::Array(items) => Value::Array(items.clone()),
            Value::Object(_) => merge(output.get(key).unwrap_or(&Value::Null), source_value),
            _ => source_value.clone(),
        };
        output.insert(key.clone(), merged);
    }

    Value::Object(output)
}

/// Loose truthiness as used by the wizard forms: `null`, `false`, `0`, and
/// `""` are falsy; everything else (including empty arrays/objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the value when truthy, otherwise `default` as a JSON string.
pub fn or_default(value: Option<&Value>, default: &str) -> Value {
    match value {
        Some(v) if is_truthy(v) => v.clone(),
        _ => Value::String(default.to_string()),
    }
}

/// First of the two values that is present and non-null.
pub fn coalesce<'a>(first: Option<&'a Value>, second: Option<&'a Value>) -> Option<&'a Value> {
    first
        .filter(|v| !v.is_null())
        .or_else(|| second.filter(|v| !v.is_null()))
}

/// Renders a scalar as text. Strings are returned verbatim, `null` as empty.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Unwraps a `json!` object literal into its map; anything else yields `{}`.
pub fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
