use serde_json::{json, Map, Value};

use crate::models::resume::{About, ResumeRecord};
use crate::models::theme::THEME_SECTIONS;
use crate::theme::normalize::merge_theme_defaults;
use crate::tree::{as_text, coalesce, into_object, is_truthy};

/// Collection fields that must always be arrays.
pub const COLLECTION_FIELDS: [&str; 5] = [
    "what_i_do",
    "education",
    "experience",
    "working_skills",
    "languages",
];

/// Scalar profile fields a fresh resume starts with.
pub fn default_profile() -> Map<String, Value> {
    into_object(json!({
        "profession": "",
        "phone": "",
        "email": "",
        "location": "",
        "birth_date": "",
        "facebook": "",
        "linkedin": "",
        "avatar": "",
        "include_blogs": false,
        "can_download_cv": false,
        "language_used": "en",
    }))
}

/// Builds the canonical in-memory resume from whatever the API returned.
///
/// Theme sections go through [`merge_theme_defaults`] (with `config`
/// overrides layered over root ones), collections are forced to arrays,
/// `knowledge` is reduced to plain strings and unknown scalar fields are
/// kept untouched. Never fails.
pub fn merge_resume_defaults(resume: Option<&Value>) -> ResumeRecord {
    let mut rest = match resume {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let config = rest.remove("config");
    let mut theme_source = rest.clone();
    if let Some(Value::Object(config)) = config {
        theme_source.extend(config);
    }
    let theme = merge_theme_defaults(Some(&Value::Object(theme_source)));

    for section in THEME_SECTIONS {
        rest.remove(section);
    }

    let about = normalize_about(rest.remove("about"));
    let knowledge = normalize_knowledge(rest.remove("knowledge"));
    let [what_i_do, education, experience, working_skills, languages] =
        COLLECTION_FIELDS.map(|field| take_array(&mut rest, field));

    let mut profile = default_profile();
    profile.extend(rest);

    ResumeRecord {
        profile,
        about,
        what_i_do,
        education,
        experience,
        working_skills,
        knowledge,
        languages,
        theme,
    }
}

fn take_array(fields: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match fields.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// `short_description` falls back to the legacy `title` key.
fn normalize_about(raw: Option<Value>) -> About {
    let mut extra = match raw {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let short_description = coalesce(extra.get("short_description"), extra.get("title"))
        .map(as_text)
        .unwrap_or_default();
    let description = extra
        .remove("description")
        .map(|v| as_text(&v))
        .unwrap_or_default();
    extra.remove("short_description");

    About {
        short_description,
        description,
        extra,
    }
}

/// The API stores bare strings; older drafts stored `{value}` wrappers.
fn normalize_knowledge(raw: Option<Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("value")
                .filter(|v| is_truthy(v))
                .map(as_text)
                .unwrap_or_default(),
            _ => String::new(),
        })
        .collect()
}
