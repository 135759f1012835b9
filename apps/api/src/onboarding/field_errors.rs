use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::tree::{as_text, is_truthy};

/// Field path (`experience.0.company`) → message.
pub type FieldErrors = BTreeMap<String, String>;

/// Top-level keys that describe the whole request rather than a field.
const NON_FIELD_KEYS: [&str; 2] = ["detail", "message"];

/// Flattens a nested error tree (as returned by the resume API or by
/// [`crate::onboarding::validation`]) into per-field messages.
///
/// - arrays of strings are joined with a space
/// - other arrays recurse by index, objects by key
/// - remaining truthy scalars are stringified; empty and falsy ones skipped
///
/// A non-object root yields no field errors.
pub fn collect_field_errors(errors: &Value) -> FieldErrors {
    let mut collected = FieldErrors::new();
    if let Value::Object(map) = errors {
        for (key, value) in map {
            assign(&mut collected, key, value);
        }
    }
    collected
}

fn assign(collected: &mut FieldErrors, path: &str, value: &Value) {
    if path.is_empty() {
        return;
    }

    match value {
        Value::Array(items) if items.is_empty() => {}
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let message = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            collected.insert(path.to_string(), message);
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                assign(collected, &format!("{path}.{index}"), item);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                assign(collected, &format!("{path}.{key}"), nested);
            }
        }
        other if is_truthy(other) => {
            collected.insert(path.to_string(), as_text(other));
        }
        _ => {}
    }
}

/// One human-readable line for an error body: `detail`, then `message`,
/// then `fallback`.
pub fn describe_error(body: Option<&Value>, fallback: &str) -> String {
    NON_FIELD_KEYS
        .iter()
        .find_map(|key| {
            body.and_then(|b| b.get(key))
                .filter(|v| is_truthy(v))
                .map(as_text)
        })
        .unwrap_or_else(|| fallback.to_string())
}

/// Result of submitting one onboarding step.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: FieldErrors,
}

impl SubmitOutcome {
    pub fn failed(body: &Value, fallback: &str) -> Self {
        let mut field_errors = collect_field_errors(body);
        field_errors.retain(|path, _| !NON_FIELD_KEYS.contains(&path.as_str()));
        Self {
            success: false,
            message: Some(describe_error(Some(body), fallback)),
            field_errors,
        }
    }

    /// Message for the dismissable banner. Errors that map onto fields are
    /// shown inline instead.
    pub fn banner(&self) -> Option<&str> {
        if self.field_errors.is_empty() {
            self.message.as_deref()
        } else {
            None
        }
    }
}
