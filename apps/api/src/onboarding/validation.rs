use std::ops::RangeInclusive;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::theme::THEME_SECTIONS;
use crate::onboarding::coerce::{as_number, is_blank, is_month_value, to_month_input_value};
use crate::onboarding::steps::Step;
use crate::theme::normalize::merge_theme_defaults;
use crate::tree::is_truthy;

pub const LANGUAGE_LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Native"];
const NOTES_MAX_CHARS: usize = 500;

/// Outcome of checking one step's form values.
///
/// `errors` mirrors the resume API's error bodies: field → list of messages,
/// with per-row objects for collections, so both flow through
/// [`crate::onboarding::field_errors::collect_field_errors`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Value,
}

impl ValidationReport {
    fn from_errors(errors: Map<String, Value>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors: Value::Object(errors),
        }
    }
}

pub fn validate_step(step: Step, values: &Value) -> ValidationReport {
    let errors = match step {
        Step::Profile => validate_profile(values),
        Step::Experience => validate_experience(values),
        Step::Education => validate_education(values),
        Step::Skills => validate_skills(values),
        Step::Theme => validate_theme(values),
        Step::Logout => Map::new(),
    };
    ValidationReport::from_errors(errors)
}

fn missing(values: &Value, key: &str) -> bool {
    values.get(key).map_or(true, is_blank)
}

fn require(errors: &mut Map<String, Value>, values: &Value, key: &str, message: &str) {
    if missing(values, key) {
        errors.insert(key.to_string(), json!([message]));
    }
}

fn looks_like_email(text: &str) -> bool {
    let Some((local, domain)) = text.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !text.trim().contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// Validates every row of a collection. Rows without problems are reported
/// as `{}` so indices line up with the submitted list.
fn validate_rows(
    errors: &mut Map<String, Value>,
    values: &Value,
    key: &str,
    min_rows_message: Option<&str>,
    check: impl Fn(&Value) -> Map<String, Value>,
) {
    let rows = values.get(key).and_then(Value::as_array);
    let rows = rows.map(Vec::as_slice).unwrap_or_default();

    if rows.is_empty() {
        if let Some(message) = min_rows_message {
            errors.insert(key.to_string(), json!([message]));
        }
        return;
    }

    let row_errors: Vec<Map<String, Value>> = rows.iter().map(check).collect();
    if row_errors.iter().any(|row| !row.is_empty()) {
        let row_errors = row_errors.into_iter().map(Value::Object).collect();
        errors.insert(key.to_string(), Value::Array(row_errors));
    }
}

fn validate_profile(values: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    require(&mut errors, values, "profession", "Profession is required.");
    require(&mut errors, values, "phone", "Phone number is required.");
    require(&mut errors, values, "email", "Email is required.");
    if !errors.contains_key("email") {
        let email = values.get("email").and_then(Value::as_str).unwrap_or_default();
        if !looks_like_email(email) {
            errors.insert("email".to_string(), json!(["Please enter a valid email address."]));
        }
    }
    require(&mut errors, values, "location", "Location is required.");
    require(&mut errors, values, "language_used", "Primary language is required.");

    let about = values.get("about").cloned().unwrap_or(Value::Null);
    let mut about_errors = Map::new();
    require(&mut about_errors, &about, "short_description", "Headline is required.");
    require(&mut about_errors, &about, "description", "Short bio is required.");
    if !about_errors.is_empty() {
        errors.insert("about".to_string(), Value::Object(about_errors));
    }
    errors
}

fn validate_experience(values: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    validate_rows(
        &mut errors,
        values,
        "experience",
        Some("Add at least one experience entry."),
        |row| {
            let mut row_errors = Map::new();
            require(&mut row_errors, row, "company", "Company is required.");
            require(&mut row_errors, row, "role", "Role is required.");
            require(&mut row_errors, row, "start_date", "Start date is required.");
            row_errors
        },
    );
    validate_rows(&mut errors, values, "what_i_do", None, |row| {
        let mut row_errors = Map::new();
        require(&mut row_errors, row, "title", "Service name is required.");
        require(&mut row_errors, row, "description", "Service description is required.");
        row_errors
    });
    errors
}

fn validate_education(values: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    validate_rows(
        &mut errors,
        values,
        "education",
        Some("Add at least one education entry."),
        |row| {
            let mut row_errors = Map::new();
            require(&mut row_errors, row, "institution", "School / University is required.");
            require(&mut row_errors, row, "degree", "Degree is required.");
            require(&mut row_errors, row, "start_date", "Start date is required.");

            let current = row.get("current").is_some_and(is_truthy);
            if !current {
                require(
                    &mut row_errors,
                    row,
                    "end_date",
                    "End date is required unless currently studying.",
                );
            }
            if !current && !row_errors.contains_key("end_date") {
                let start = to_month_input_value(row.get("start_date"));
                let end = to_month_input_value(row.get("end_date"));
                if is_month_value(&start) && is_month_value(&end) && end < start {
                    row_errors.insert(
                        "end_date".to_string(),
                        json!(["End date can’t be before start date."]),
                    );
                }
            }

            let notes_len = row
                .get("notes")
                .and_then(Value::as_str)
                .map_or(0, |notes| notes.chars().count());
            if notes_len > NOTES_MAX_CHARS {
                row_errors.insert(
                    "notes".to_string(),
                    json!(["Keep notes under 500 characters."]),
                );
            }
            row_errors
        },
    );
    errors
}

fn check_percentage(row_errors: &mut Map<String, Value>, row: &Value) {
    let message = match row.get("percentage") {
        None | Some(Value::Null) => Some("Percentage is required."),
        Some(Value::String(s)) if s.trim().is_empty() => Some("Percentage must be a number."),
        value => match as_number(value) {
            None => Some("Percentage must be a number."),
            Some(n) if n < 0.0 => Some("Minimum is 0%."),
            Some(n) if n > 100.0 => Some("Maximum is 100%."),
            Some(_) => None,
        },
    };
    if let Some(message) = message {
        row_errors.insert("percentage".to_string(), json!([message]));
    }
}

fn validate_skills(values: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    validate_rows(&mut errors, values, "working_skills", None, |row| {
        let mut row_errors = Map::new();
        require(&mut row_errors, row, "title", "Skill name is required.");
        check_percentage(&mut row_errors, row);
        row_errors
    });
    validate_rows(&mut errors, values, "knowledge", None, |row| {
        let mut row_errors = Map::new();
        require(&mut row_errors, row, "value", "Keyword is required.");
        row_errors
    });
    validate_rows(&mut errors, values, "languages", None, |row| {
        let mut row_errors = Map::new();
        require(&mut row_errors, row, "title", "Language is required.");
        if let Some(level) = row.get("level").filter(|v| !is_blank(v)) {
            if !level.as_str().is_some_and(|l| LANGUAGE_LEVELS.contains(&l)) {
                row_errors.insert(
                    "level".to_string(),
                    json!(["Choose a valid proficiency level."]),
                );
            }
        }
        check_percentage(&mut row_errors, row);
        row_errors
    });
    errors
}

/// Labels shown in palette errors, one per color key.
const COLOR_LABELS: [(&str, &str); 10] = [
    ("primary", "Primary"),
    ("secondary", "Secondary"),
    ("background", "Background"),
    ("surface", "Surface"),
    ("surfaceMuted", "Muted surface"),
    ("surfaceElevation", "Surface elevation"),
    ("text", "Body text"),
    ("textMuted", "Muted text"),
    ("border", "Border"),
    ("emphasis", "Emphasis"),
];

fn check_palette(palette: &Value) -> Value {
    let Value::Object(_) = palette else {
        return json!(["Must be an object."]);
    };
    let mut palette_errors = Map::new();
    for (key, label) in COLOR_LABELS {
        if !palette.get(key).is_some_and(|c| c.is_string() && !is_blank(c)) {
            palette_errors.insert(key.to_string(), json!([format!("{label} is required.")]));
        }
    }
    Value::Object(palette_errors)
}

/// Checks an optional numeric field. Absent keys pass; present values must
/// coerce to a number and, when `range` is given, fall inside it.
fn check_number(
    errors: &mut Map<String, Value>,
    section: &Value,
    key: &str,
    label: &str,
    range: Option<RangeInclusive<f64>>,
) {
    let Some(value) = section.get(key) else {
        return;
    };
    let message = match (as_number(Some(value)), range) {
        (None, _) => format!("{label} must be numeric."),
        (Some(number), Some(range)) if !range.contains(&number) => {
            format!("{label} must be between {} and {}.", range.start(), range.end())
        }
        _ => return,
    };
    errors.insert(key.to_string(), json!([message]));
}

/// Runs `check` over an optional nested object. Absent sections pass and
/// anything other than an object is reported as such.
fn check_section(
    errors: &mut Map<String, Value>,
    parent: &Value,
    key: &str,
    check: impl FnOnce(&Value) -> Map<String, Value>,
) {
    let section_errors = match parent.get(key) {
        None => return,
        Some(section @ Value::Object(_)) => Value::Object(check(section)),
        Some(_) => json!(["Must be an object."]),
    };
    if section_errors.as_object().map_or(true, |e| !e.is_empty()) {
        errors.insert(key.to_string(), section_errors);
    }
}

fn check_background_overlay(overlay: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    check_number(&mut errors, overlay, "density", "Density", Some(0.0..=300.0));
    check_number(&mut errors, overlay, "size", "Size", Some(0.0..=200.0));
    check_number(&mut errors, overlay, "opacity", "Opacity", Some(0.0..=1.0));
    check_section(&mut errors, overlay, "animation", |animation| {
        let mut errors = Map::new();
        check_number(&mut errors, animation, "speed", "Speed", Some(0.0..=200.0));
        check_number(&mut errors, animation, "variance", "Variance", Some(0.0..=200.0));
        errors
    });
    errors
}

fn check_motion_target(target: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    check_number(&mut errors, target, "opacity", "Opacity", None);
    check_number(&mut errors, target, "translateY", "TranslateY", None);
    errors
}

fn check_motion(motion: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    check_section(&mut errors, motion, "initial", check_motion_target);
    check_section(&mut errors, motion, "animate", check_motion_target);
    check_section(&mut errors, motion, "transition", |transition| {
        let mut errors = Map::new();
        check_number(&mut errors, transition, "duration", "Duration", None);
        errors
    });
    errors
}

fn check_animations(animations: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    check_section(&mut errors, animations, "card", check_motion);
    check_section(&mut errors, animations, "section", check_motion);
    errors
}

fn check_gradient(gradient: &Value) -> Map<String, Value> {
    let mut errors = Map::new();
    check_number(&mut errors, gradient, "angle", "Angle", Some(0.0..=360.0));
    if let Some(stops) = gradient.get("stops") {
        match stops.as_array() {
            Some(stops) if stops.len() < 2 => {
                errors.insert("stops".to_string(), json!(["Add at least two gradient stops."]));
            }
            Some(stops) => {
                let stop_errors: Vec<Value> = stops
                    .iter()
                    .map(|stop| match stop.as_str() {
                        Some(s) if !s.trim().is_empty() => Value::Null,
                        _ => json!(["Gradient stop is required."]),
                    })
                    .collect();
                if stop_errors.iter().any(|e| !e.is_null()) {
                    errors.insert("stops".to_string(), Value::Array(stop_errors));
                }
            }
            None => {
                errors.insert("stops".to_string(), json!(["Must be a list."]));
            }
        }
    }
    errors
}

/// Checks the raw sections first, then the normalized theme, which is where
/// nested type mismatches left by normalization surface.
fn validate_theme(values: &Value) -> Map<String, Value> {
    let mut errors = Map::new();

    for section in THEME_SECTIONS {
        match values.get(section) {
            None | Some(Value::Object(_)) => {}
            Some(Value::String(_)) if section == "theme" => {}
            Some(_) => {
                errors.insert(section.to_string(), json!(["Must be an object."]));
            }
        }
    }

    let mut theme_errors = Map::new();
    if let Some(raw_theme) = values.get("theme").filter(|t| t.is_object()) {
        if raw_theme.get("id").is_some() {
            require(&mut theme_errors, raw_theme, "id", "Select a theme preset.");
        }
        if let Some(mode) = raw_theme.get("mode") {
            if !matches!(mode.as_str(), Some("light" | "dark")) {
                theme_errors.insert("mode".to_string(), json!(["Choose a mode."]));
            }
        }
    }

    let normalized = merge_theme_defaults(Some(values));
    let theme = &normalized.theme;

    let mut mode_errors = Map::new();
    for mode in ["light", "dark"] {
        let palette = theme.get("modes").and_then(|m| m.get(mode));
        let palette_errors = check_palette(palette.unwrap_or(&Value::Null));
        if palette_errors.as_object().map_or(true, |e| !e.is_empty()) {
            mode_errors.insert(mode.to_string(), palette_errors);
        }
    }
    if !mode_errors.is_empty() {
        theme_errors.insert("modes".to_string(), Value::Object(mode_errors));
    }

    if let Some(variants) = theme.get("paletteVariants").and_then(Value::as_array) {
        let variant_errors: Vec<Value> = variants
            .iter()
            .map(|v| match v.as_str() {
                Some(s) if !s.trim().is_empty() => Value::Null,
                _ => json!(["Palette colour is required."]),
            })
            .collect();
        if variant_errors.iter().any(|e| !e.is_null()) {
            theme_errors.insert("paletteVariants".to_string(), Value::Array(variant_errors));
        }
    }

    check_section(&mut theme_errors, theme, "backgroundOverlay", check_background_overlay);
    check_section(&mut theme_errors, theme, "animations", check_animations);

    let mut gradient_errors = Map::new();
    for name in ["primary", "primaryHover"] {
        if let Some(gradient) = theme.get("gradients").and_then(|g| g.get(name)) {
            let errors = check_gradient(gradient);
            if !errors.is_empty() {
                gradient_errors.insert(name.to_string(), Value::Object(errors));
            }
        }
    }
    if !gradient_errors.is_empty() {
        theme_errors.insert("gradients".to_string(), Value::Object(gradient_errors));
    }

    if !theme_errors.is_empty() && !errors.contains_key("theme") {
        errors.insert("theme".to_string(), Value::Object(theme_errors));
    }

    let position = normalized.layout.get("sidebarPosition").and_then(Value::as_str);
    if !matches!(position, Some("left" | "right")) && !errors.contains_key("layout") {
        errors.insert(
            "layout".to_string(),
            json!({"sidebarPosition": ["Sidebar position must be left or right."]}),
        );
    }
    errors
}
