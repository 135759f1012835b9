//! Onboarding steps and their record ↔ form mappings.
//!
//! `extract` narrows a normalized [`ResumeRecord`] to the defaults one form
//! needs; `transform` maps submitted form values back into the PATCH payload
//! for `/api/my-resume`. Both are pure and never fail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::models::resume::ResumeRecord;
use crate::onboarding::coerce::{
    clamp_percentage, clean_array_payload, format_date_to_iso, normalize_percentage,
    sanitize_array_input, to_month_input_value,
};
use crate::theme::normalize::merge_theme_defaults;
use crate::tree::{coalesce, into_object, is_truthy, or_default};

pub const SKILL_DEFAULT_PERCENT: i64 = 60;
pub const LANGUAGE_DEFAULT_PERCENT: i64 = 70;
pub const DEFAULT_LANGUAGE_LEVEL: &str = "Intermediate";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    #[serde(rename = "step_1")]
    Profile,
    #[serde(rename = "step_2")]
    Experience,
    #[serde(rename = "step_3")]
    Education,
    #[serde(rename = "step_4")]
    Skills,
    #[serde(rename = "theme")]
    Theme,
    #[serde(rename = "logout")]
    Logout,
}

/// Display metadata for the progress bar.
#[derive(Debug, Clone, Serialize)]
pub struct StepMeta {
    pub key: Step,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl Step {
    pub const SEQUENCE: [Step; 6] = [
        Step::Profile,
        Step::Experience,
        Step::Education,
        Step::Skills,
        Step::Theme,
        Step::Logout,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Step::Profile => "step_1",
            Step::Experience => "step_2",
            Step::Education => "step_3",
            Step::Skills => "step_4",
            Step::Theme => "theme",
            Step::Logout => "logout",
        }
    }

    pub fn meta(&self) -> StepMeta {
        let (label, icon, description) = match self {
            Step::Profile => ("Profile", "fa-user", "Introduce yourself"),
            Step::Experience => ("Experience", "fa-briefcase", "Share your professional story"),
            Step::Education => ("Education", "fa-graduation-cap", "Highlight your learning journey"),
            Step::Skills => ("Skills", "fa-cogs", "Fine tune the details"),
            Step::Theme => ("Theme", "fa-paint-brush", "Style your resume's look and feel"),
            Step::Logout => ("Logout", "fa-sign-out", "Complete your setup"),
        };
        StepMeta {
            key: *self,
            label,
            icon,
            description,
        }
    }

    /// Form defaults for this step.
    pub fn extract(&self, record: &ResumeRecord) -> Value {
        let subdomain = or_default(record.get("subdomain"), "");
        match self {
            Step::Profile => extract_profile(record, subdomain),
            Step::Experience => json!({
                "subdomain": subdomain,
                "experience": sanitize_array_input(&record.experience, empty_experience)
                    .into_iter()
                    .map(experience_to_form)
                    .collect::<Vec<_>>(),
                "what_i_do": sanitize_array_input(&record.what_i_do, empty_service),
            }),
            Step::Education => json!({
                "subdomain": subdomain,
                "education": sanitize_array_input(&record.education, empty_education)
                    .into_iter()
                    .map(education_to_form)
                    .collect::<Vec<_>>(),
            }),
            Step::Skills => extract_skills(record, subdomain),
            Step::Theme => {
                let mut defaults = merge_theme_defaults(Some(&record.theme.to_value())).to_value();
                if let Value::Object(map) = &mut defaults {
                    map.insert("subdomain".to_string(), subdomain);
                }
                defaults
            }
            Step::Logout => json!({ "subdomain": subdomain }),
        }
    }

    /// PATCH payload for the submitted form values.
    pub fn transform(&self, values: &Value) -> Value {
        match self {
            Step::Profile => transform_profile(values),
            Step::Experience => json!({
                "experience": clean_array_payload(values.get("experience"), empty_experience)
                    .into_iter()
                    .map(experience_to_payload)
                    .collect::<Vec<_>>(),
                "what_i_do": clean_array_payload(values.get("what_i_do"), empty_service),
            }),
            Step::Education => json!({
                "education": clean_array_payload(values.get("education"), empty_education)
                    .into_iter()
                    .map(education_to_payload)
                    .collect::<Vec<_>>(),
            }),
            Step::Skills => transform_skills(values),
            Step::Theme => json!({
                "config": merge_theme_defaults(Some(values)).config(),
            }),
            Step::Logout => json!({}),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Step {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::SEQUENCE
            .into_iter()
            .find(|step| step.key() == s)
            .ok_or_else(|| UnknownStep(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown onboarding step '{0}'")]
pub struct UnknownStep(pub String);

fn empty_experience() -> Map<String, Value> {
    into_object(json!({
        "company": "",
        "role": "",
        "location": "",
        "start_date": "",
        "end_date": "",
        "current": false,
        "description": "",
    }))
}

fn empty_service() -> Map<String, Value> {
    into_object(json!({ "title": "", "description": "" }))
}

fn empty_education() -> Map<String, Value> {
    into_object(json!({
        "institution": "",
        "degree": "",
        "field_of_study": "",
        "start_date": "",
        "end_date": "",
        "notes": "",
        "description": "",
    }))
}

fn empty_skill() -> Map<String, Value> {
    into_object(json!({ "title": "", "level": "", "percentage": SKILL_DEFAULT_PERCENT }))
}

fn empty_language() -> Map<String, Value> {
    into_object(json!({ "title": "", "level": "", "percentage": LANGUAGE_DEFAULT_PERCENT }))
}

fn text_field(values: &Value, key: &str) -> Value {
    or_default(values.get(key), "")
}

fn flag(values: Option<&Value>) -> Value {
    Value::Bool(values.is_some_and(is_truthy))
}

fn extract_profile(record: &ResumeRecord, subdomain: Value) -> Value {
    let mut defaults = json!({
        "subdomain": subdomain,
        "language_used": or_default(record.get("language_used"), "en"),
        "include_blogs": flag(record.get("include_blogs")),
        "can_download_cv": flag(record.get("can_download_cv")),
        "about": {
            "short_description": record.about.short_description,
            "description": record.about.description,
        },
    });
    if let Value::Object(map) = &mut defaults {
        for key in ["avatar", "profession", "phone", "email", "location", "facebook", "linkedin"] {
            map.insert(key.to_string(), or_default(record.get(key), ""));
        }
    }
    defaults
}

fn transform_profile(values: &Value) -> Value {
    let about = values.get("about").cloned().unwrap_or(Value::Null);
    let mut payload = json!({
        "language_used": text_field(values, "language_used"),
        "include_blogs": flag(values.get("include_blogs")),
        "can_download_cv": flag(values.get("can_download_cv")),
        "about": {
            "short_description": text_field(&about, "short_description"),
            "description": text_field(&about, "description"),
        },
    });
    if let Value::Object(map) = &mut payload {
        for key in ["profession", "phone", "email", "location", "facebook", "linkedin"] {
            map.insert(key.to_string(), text_field(values, key));
        }
        if let Some(upload) = values.get("avatar_upload").filter(|v| is_truthy(v)) {
            map.insert("avatar_upload".to_string(), upload.clone());
        }
    }
    payload
}

fn experience_to_form(mut item: Map<String, Value>) -> Value {
    let location = or_default(item.get("location"), "");
    let start = to_month_input_value(item.get("start_date"));
    let end = to_month_input_value(item.get("end_date"));
    let current = flag(item.get("current"));
    item.insert("location".to_string(), location);
    item.insert("start_date".to_string(), Value::String(start));
    item.insert("end_date".to_string(), Value::String(end));
    item.insert("current".to_string(), current);
    Value::Object(item)
}

fn experience_to_payload(mut item: Map<String, Value>) -> Value {
    let is_current = item.get("current").is_some_and(is_truthy);
    let location = or_default(item.get("location"), "");
    let start = format_date_to_iso(item.get("start_date"));
    let end = if is_current {
        Value::Null
    } else {
        Value::String(format_date_to_iso(item.get("end_date")))
    };
    item.insert("location".to_string(), location);
    item.insert("start_date".to_string(), Value::String(start));
    item.insert("end_date".to_string(), end);
    item.insert("current".to_string(), Value::Bool(is_current));
    Value::Object(item)
}

/// `notes` is the form name; older records only carry `description`.
fn education_notes(item: &Map<String, Value>) -> Value {
    coalesce(item.get("notes"), item.get("description"))
        .cloned()
        .unwrap_or_else(|| json!(""))
}

fn education_to_form(mut item: Map<String, Value>) -> Value {
    let field_of_study = or_default(item.get("field_of_study"), "");
    let notes = education_notes(&item);
    let start = to_month_input_value(item.get("start_date"));
    let end = to_month_input_value(item.get("end_date"));
    item.insert("field_of_study".to_string(), field_of_study);
    item.insert("notes".to_string(), notes);
    item.insert("start_date".to_string(), Value::String(start));
    item.insert("end_date".to_string(), Value::String(end));
    Value::Object(item)
}

fn education_to_payload(mut item: Map<String, Value>) -> Value {
    let field_of_study = or_default(item.get("field_of_study"), "");
    let notes = education_notes(&item);
    let start = format_date_to_iso(item.get("start_date"));
    let end = format_date_to_iso(item.get("end_date"));
    item.insert("field_of_study".to_string(), field_of_study);
    item.insert("notes".to_string(), notes.clone());
    item.insert("description".to_string(), notes);
    item.insert("start_date".to_string(), Value::String(start));
    item.insert("end_date".to_string(), Value::String(end));
    Value::Object(item)
}

fn extract_skills(record: &ResumeRecord, subdomain: Value) -> Value {
    let working_skills: Vec<Value> = sanitize_array_input(&record.working_skills, empty_skill)
        .into_iter()
        .map(|mut item| {
            let percentage = normalize_percentage(
                coalesce(item.get("percentage"), item.get("level")),
                SKILL_DEFAULT_PERCENT,
            );
            item.insert("percentage".to_string(), json!(percentage));
            Value::Object(item)
        })
        .collect();

    let languages: Vec<Value> = sanitize_array_input(&record.languages, empty_language)
        .into_iter()
        .map(|mut item| {
            let level = or_default(item.get("level"), DEFAULT_LANGUAGE_LEVEL);
            let percentage = normalize_percentage(
                coalesce(item.get("percentage"), item.get("proficiency")),
                LANGUAGE_DEFAULT_PERCENT,
            );
            item.insert("level".to_string(), level);
            item.insert("percentage".to_string(), json!(percentage));
            Value::Object(item)
        })
        .collect();

    json!({
        "subdomain": subdomain,
        "working_skills": working_skills,
        "knowledge": knowledge_to_form(&record.knowledge),
        "languages": languages,
    })
}

fn transform_skills(values: &Value) -> Value {
    let working_skills: Vec<Value> =
        clean_array_payload(values.get("working_skills"), empty_skill)
            .into_iter()
            .map(|mut item| {
                let percentage = clamp_percentage(item.get("percentage"), SKILL_DEFAULT_PERCENT);
                item.insert("percentage".to_string(), json!(percentage));
                Value::Object(item)
            })
            .collect();

    let languages: Vec<Value> = clean_array_payload(values.get("languages"), empty_language)
        .into_iter()
        .map(|mut item| {
            let level = or_default(item.get("level"), DEFAULT_LANGUAGE_LEVEL);
            let percentage = clamp_percentage(item.get("percentage"), LANGUAGE_DEFAULT_PERCENT);
            item.insert("level".to_string(), level);
            item.insert("percentage".to_string(), json!(percentage));
            Value::Object(item)
        })
        .collect();

    json!({
        "working_skills": working_skills,
        "knowledge": knowledge_to_payload(values.get("knowledge")),
        "languages": languages,
    })
}

/// Field arrays need object rows, so keywords travel as `{value}` in forms.
fn knowledge_to_form(knowledge: &[String]) -> Vec<Value> {
    if knowledge.is_empty() {
        return vec![json!({ "value": "" })];
    }
    knowledge.iter().map(|k| json!({ "value": k })).collect()
}

fn knowledge_to_payload(knowledge: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = knowledge else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.get("value").and_then(Value::as_str))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::defaults::merge_resume_defaults;

    fn sample_record() -> ResumeRecord {
        merge_resume_defaults(Some(&json!({
            "subdomain": "dana",
            "profession": "Backend Engineer",
            "phone": "+40 700 000 000",
            "email": "dana@example.com",
            "location": "Chisinau",
            "facebook": "",
            "linkedin": "https://linkedin.com/in/dana",
            "language_used": "ro",
            "include_blogs": true,
            "can_download_cv": false,
            "about": {"short_description": "Builder", "description": "Ships things."},
            "experience": [{
                "company": "Acme",
                "role": "Engineer",
                "location": null,
                "start_date": "2020-02-01",
                "end_date": "2022-06-30",
                "current": false,
                "description": "APIs",
            }, {
                "company": "Initech",
                "role": "Lead",
                "start_date": "2022-07-01",
                "end_date": null,
                "current": true,
            }],
            "what_i_do": [{"title": "Consulting", "description": "Architecture reviews"}],
            "education": [{
                "institution": "UTM",
                "degree": "BSc",
                "start_date": "2014-09-01",
                "end_date": "2018-06-01",
                "description": "Thesis on compilers",
                "notes": null,
            }],
            "working_skills": [
                {"title": "Rust", "percentage": null, "level": "85%"},
                {"title": "Go", "percentage": 140},
            ],
            "knowledge": ["CI/CD", {"value": "OKRs"}],
            "languages": [
                {"title": "English", "percentage": null, "proficiency": "90"},
                {"title": "French", "level": "Beginner"},
            ],
            "config": {"theme": {"id": "ryancv", "mode": "dark"}},
        })))
    }

    #[test]
    fn test_step_keys_round_trip() {
        for step in Step::SEQUENCE {
            assert_eq!(step.key().parse::<Step>(), Ok(step));
            assert_eq!(serde_json::to_value(step).unwrap(), json!(step.key()));
        }
        assert!("step_9".parse::<Step>().is_err());
    }

    #[test]
    fn test_profile_round_trip() {
        let record = sample_record();
        let form = Step::Profile.extract(&record);
        assert_eq!(form["subdomain"], "dana");
        assert_eq!(form["about"]["short_description"], "Builder");

        let payload = Step::Profile.transform(&form);
        let keys = [
            "profession",
            "phone",
            "email",
            "location",
            "facebook",
            "linkedin",
            "language_used",
        ];
        for key in keys {
            assert_eq!(payload[key], record.get(key).cloned().unwrap(), "{key}");
        }
        assert_eq!(payload["include_blogs"], true);
        assert_eq!(payload["can_download_cv"], false);
        assert_eq!(payload["about"]["description"], "Ships things.");
        assert!(payload.get("avatar_upload").is_none());
        assert!(payload.get("subdomain").is_none());
    }

    #[test]
    fn test_profile_avatar_upload_passes_through_when_set() {
        let payload = Step::Profile.transform(&json!({"avatar_upload": "data:image/png;base64,AA=="}));
        assert_eq!(payload["avatar_upload"], "data:image/png;base64,AA==");
        assert_eq!(payload["language_used"], "");
    }

    #[test]
    fn test_experience_dates_and_current() {
        let record = sample_record();
        let form = Step::Experience.extract(&record);
        assert_eq!(form["experience"][0]["start_date"], "2020-02");
        assert_eq!(form["experience"][0]["end_date"], "2022-06");
        assert_eq!(form["experience"][0]["location"], "");
        assert_eq!(form["experience"][1]["current"], true);

        let payload = Step::Experience.transform(&form);
        assert_eq!(payload["experience"][0]["start_date"], "2020-02-01");
        assert_eq!(payload["experience"][0]["end_date"], "2022-06-01");
        assert_eq!(payload["experience"][0]["company"], "Acme");
        assert_eq!(payload["experience"][1]["end_date"], Value::Null);
        assert_eq!(payload["what_i_do"][0]["title"], "Consulting");
    }

    #[test]
    fn test_empty_collections_get_placeholder_rows() {
        let record = merge_resume_defaults(None);
        let form = Step::Experience.extract(&record);
        assert_eq!(form["experience"].as_array().unwrap().len(), 1);
        assert_eq!(form["what_i_do"], json!([{"title": "", "description": ""}]));

        let payload = Step::Experience.transform(&form);
        assert_eq!(payload["what_i_do"], json!([]));
    }

    #[test]
    fn test_education_notes_fall_back_to_description() {
        let record = sample_record();
        let form = Step::Education.extract(&record);
        assert_eq!(form["education"][0]["notes"], "Thesis on compilers");
        assert_eq!(form["education"][0]["start_date"], "2014-09");

        let payload = Step::Education.transform(&form);
        let entry = &payload["education"][0];
        assert_eq!(entry["notes"], "Thesis on compilers");
        assert_eq!(entry["description"], "Thesis on compilers");
        assert_eq!(entry["end_date"], "2018-06-01");
        assert_eq!(entry["institution"], "UTM");
    }

    #[test]
    fn test_skills_percentages_and_knowledge() {
        let record = sample_record();
        let form = Step::Skills.extract(&record);
        assert_eq!(form["working_skills"][0]["percentage"], 85);
        assert_eq!(form["working_skills"][1]["percentage"], 100);
        assert_eq!(form["languages"][0]["percentage"], 90);
        assert_eq!(form["languages"][0]["level"], "Intermediate");
        assert_eq!(form["languages"][1]["percentage"], 70);
        assert_eq!(form["languages"][1]["level"], "Beginner");
        assert_eq!(form["knowledge"], json!([{"value": "CI/CD"}, {"value": "OKRs"}]));

        let mut edited = form.clone();
        edited["knowledge"] = json!([{"value": "  Kanban "}, {"value": ""}, {"value": "OKRs"}]);
        edited["working_skills"][0]["percentage"] = json!("75%");
        let payload = Step::Skills.transform(&edited);
        assert_eq!(payload["knowledge"], json!(["Kanban", "OKRs"]));
        assert_eq!(payload["working_skills"][0]["percentage"], 75);
        assert_eq!(payload["languages"][0]["title"], "English");
    }

    #[test]
    fn test_theme_step_wraps_config() {
        let record = sample_record();
        let form = Step::Theme.extract(&record);
        assert_eq!(form["subdomain"], "dana");
        assert_eq!(form["theme"]["id"], "ryancv");
        assert_eq!(form["theme"]["mode"], "dark");

        let payload = Step::Theme.transform(&form);
        assert_eq!(payload["config"], record.theme.config());
        assert!(payload.get("theme").is_none());
    }

    #[test]
    fn test_logout_step() {
        let record = sample_record();
        assert_eq!(Step::Logout.extract(&record), json!({"subdomain": "dana"}));
        assert_eq!(Step::Logout.transform(&json!({"anything": 1})), json!({}));
    }
}
