use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::theme::NormalizedTheme;

/// Headline and bio block of a resume.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct About {
    pub short_description: String,
    pub description: String,
    /// Keys the API sent that the wizard does not edit (e.g. legacy `title`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Normalized resume as held in memory between saves.
///
/// `profile` carries the scalar fields (`profession`, `email`, ...) plus any
/// unknown keys the API returned, untouched. Theme sections serialize from a
/// single [`NormalizedTheme`], so the flattened and `config` shapes always
/// agree.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResumeRecord {
    #[serde(flatten)]
    pub profile: Map<String, Value>,
    pub about: About,
    pub what_i_do: Vec<Value>,
    pub education: Vec<Value>,
    pub experience: Vec<Value>,
    pub working_skills: Vec<Value>,
    pub knowledge: Vec<String>,
    pub languages: Vec<Value>,
    #[serde(flatten)]
    pub theme: NormalizedTheme,
}

impl ResumeRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.profile.get(key)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
