//! Lenient coercions used when moving data between the resume record and
//! the step forms. None of these fail: unparseable input falls back to a
//! default or passes through unchanged.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

use crate::tree::{as_text, is_truthy};

// Digit classes are ASCII-only: `\d` in `regex` also matches other scripts'
// digits, which would let multi-byte text through the date slicing below.
static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+(\.[0-9]+)?").expect("numeric pattern is valid"));
static STRICT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("number pattern is valid")
});
static RADIX_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^0(?:[xX](?P<hex>[0-9a-fA-F]+)|[oO](?P<oct>[0-7]+)|[bB](?P<bin>[01]+))$")
        .expect("radix pattern is valid")
});
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"));
static MONTH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("month pattern is valid"));

/// Numeric reading of a form value: `null`, `""` and `false` read as 0,
/// `true` as 1, numeric strings as their value. `None` when not numeric.
///
/// Strings follow the browser's number coercion: decimal and exponent
/// forms, signed `Infinity`, and unsigned `0x`/`0o`/`0b` literals.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number_text(s.trim()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_number_text(text: &str) -> Option<f64> {
    if text.is_empty() {
        return Some(0.0);
    }
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if STRICT_NUMBER.is_match(text) {
        return text.parse().ok();
    }
    let caps = RADIX_NUMBER.captures(text)?;
    let (digits, radix) = [("hex", 16), ("oct", 8), ("bin", 2)]
        .into_iter()
        .find_map(|(name, radix)| caps.name(name).map(|m| (m.as_str(), radix)))?;
    // Accumulated as f64 so long literals saturate to infinity.
    Some(digits.chars().fold(0.0, |acc, c| {
        acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
    }))
}

/// Rounds half-way values up, as the form inputs do.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn clamp_to_percent(value: f64) -> i64 {
    round_half_up(value).clamp(0.0, 100.0) as i64
}

/// Reads a percentage out of a loosely typed value and clamps it to 0..=100.
///
/// Falls back to the first number embedded in a string (`"75%"` → 75), and
/// to `fallback` when nothing numeric is found.
pub fn clamp_percentage(value: Option<&Value>, fallback: i64) -> i64 {
    if let Some(number) = as_number(value) {
        return clamp_to_percent(number);
    }

    let embedded = value
        .and_then(Value::as_str)
        .and_then(|s| NUMERIC_PATTERN.find(s))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match embedded {
        Some(number) => clamp_to_percent(number),
        None => clamp_to_percent(fallback as f64),
    }
}

/// Like [`clamp_percentage`], but blank input (`None`, `null`, `""`) means
/// "use the fallback" rather than zero.
pub fn normalize_percentage(value: Option<&Value>, fallback: i64) -> i64 {
    match value {
        None | Some(Value::Null) => clamp_percentage(None, fallback),
        Some(Value::String(s)) if s.is_empty() => clamp_percentage(None, fallback),
        Some(v) => clamp_percentage(Some(v), fallback),
    }
}

fn date_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(as_text)
}

fn parse_loose_date(text: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(text, "%Y/%m/%d").ok())
}

/// Converts form dates to the API's `YYYY-MM-DD`. Month values get day 01;
/// unparseable text is returned unchanged and blank input becomes `""`.
pub fn format_date_to_iso(value: Option<&Value>) -> String {
    let Some(text) = date_text(value) else {
        return String::new();
    };
    if ISO_DATE.is_match(&text) {
        return text;
    }
    if MONTH_DATE.is_match(&text) {
        return format!("{text}-01");
    }
    match parse_loose_date(&text) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => text,
    }
}

/// Converts API dates to the `YYYY-MM` month-input format.
pub fn to_month_input_value(value: Option<&Value>) -> String {
    let Some(text) = date_text(value) else {
        return String::new();
    };
    if MONTH_DATE.is_match(&text) {
        return text;
    }
    if ISO_DATE.is_match(&text) {
        if let Some(month) = text.get(..7) {
            return month.to_string();
        }
    }
    match parse_loose_date(&text) {
        Some(date) => date.format("%Y-%m").to_string(),
        None => text,
    }
}

pub fn is_month_value(text: &str) -> bool {
    MONTH_DATE.is_match(text)
}

fn overlay(factory: fn() -> Map<String, Value>, item: &Value) -> Map<String, Value> {
    let mut entry = factory();
    if let Value::Object(fields) = item {
        entry.extend(fields.clone());
    }
    entry
}

/// Form rows for a collection: each item layered over the empty row, and a
/// single empty row when there is nothing to show.
pub fn sanitize_array_input(
    items: &[Value],
    factory: fn() -> Map<String, Value>,
) -> Vec<Map<String, Value>> {
    if items.is_empty() {
        return vec![factory()];
    }
    items.iter().map(|item| overlay(factory, item)).collect()
}

/// Payload rows for a collection: each item layered over the empty row,
/// dropping rows whose every field is blank (whitespace or `null`).
pub fn clean_array_payload(
    items: Option<&Value>,
    factory: fn() -> Map<String, Value>,
) -> Vec<Map<String, Value>> {
    let Some(Value::Array(items)) = items else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| overlay(factory, item))
        .filter(|entry| entry.values().any(|v| !is_blank(v)))
        .collect()
}

/// Whitespace-only strings and `null` are blank; `false` and `0` are not.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
