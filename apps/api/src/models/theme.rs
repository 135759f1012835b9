use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// Id stored on user-authored themes that do not come from the catalog.
pub const CUSTOM_THEME_ID: &str = "custom";

/// The four configuration sections carried by every theme.
pub const THEME_SECTIONS: [&str; 4] = ["theme", "layout", "features", "content"];

/// Color keys every mode palette must carry.
pub const COLOR_KEYS: [&str; 10] = [
    "primary",
    "secondary",
    "background",
    "surface",
    "surfaceMuted",
    "surfaceElevation",
    "text",
    "textMuted",
    "border",
    "emphasis",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 2] = [ThemeMode::Light, ThemeMode::Dark];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Only the literal string `"dark"` selects dark mode; anything else,
    /// including a missing value, falls back to light.
    pub fn clamp(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = UnknownThemeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(UnknownThemeMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme mode '{0}'")]
pub struct UnknownThemeMode(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetId {
    #[serde(rename = "bostami")]
    Bostami,
    #[serde(rename = "ryancv")]
    RyanCv,
    #[serde(rename = "bostami-fusion")]
    BostamiFusion,
    #[serde(rename = "ryancv-fusion")]
    RyanCvFusion,
}

impl PresetId {
    pub const ALL: [PresetId; 4] = [
        PresetId::Bostami,
        PresetId::RyanCv,
        PresetId::BostamiFusion,
        PresetId::RyanCvFusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetId::Bostami => "bostami",
            PresetId::RyanCv => "ryancv",
            PresetId::BostamiFusion => "bostami-fusion",
            PresetId::RyanCvFusion => "ryancv-fusion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PresetId::Bostami => "Bostami Classic",
            PresetId::RyanCv => "RyanCV",
            PresetId::BostamiFusion => "Bostami Fusion",
            PresetId::RyanCvFusion => "RyanCV Fusion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PresetId::Bostami => "Vibrant gradients with playful overlays and upbeat motion.",
            PresetId::RyanCv => "Structured elegance with crisp contrasts and professional tone.",
            PresetId::BostamiFusion => {
                "Bold Bostami gradients meet RyanCV's sophisticated surfaces for dramatic depth."
            }
            PresetId::RyanCvFusion => {
                "RyanCV structure infused with Bostami color energy for a modern hybrid look."
            }
        }
    }

    /// True for catalog ids and for [`CUSTOM_THEME_ID`].
    pub fn is_known_theme_id(id: &str) -> bool {
        id == CUSTOM_THEME_ID || id.parse::<PresetId>().is_ok()
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme preset '{0}'")]
pub struct UnknownPreset(pub String);

/// Entry of the theme picker (`theme.availableThemes`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThemeOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresetSummary {
    pub id: PresetId,
    pub label: &'static str,
    pub description: &'static str,
}

/// Canonical theme configuration produced by the normalizer.
///
/// Serializes flattened (`theme`, `layout`, `features`, `content`) and once
/// more nested under `config`, so API consumers can read either shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTheme {
    pub theme: Value,
    pub layout: Value,
    pub features: Value,
    pub content: Value,
}

impl NormalizedTheme {
    pub fn mode(&self) -> ThemeMode {
        ThemeMode::clamp(self.theme.get("mode"))
    }

    pub fn id(&self) -> &str {
        self.theme
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or(PresetId::Bostami.as_str())
    }

    /// The `config` projection sent in API patch payloads.
    pub fn config(&self) -> Value {
        json!({
            "theme": self.theme,
            "layout": self.layout,
            "features": self.features,
            "content": self.content,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut value = self.config();
        if let Value::Object(map) = &mut value {
            map.insert("config".to_string(), self.config());
        }
        value
    }
}

impl Serialize for NormalizedTheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Projection<'a> {
            theme: &'a Value,
            layout: &'a Value,
            features: &'a Value,
            content: &'a Value,
        }

        let projection = Projection {
            theme: &self.theme,
            layout: &self.layout,
            features: &self.features,
            content: &self.content,
        };

        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("theme", &self.theme)?;
        map.serialize_entry("layout", &self.layout)?;
        map.serialize_entry("features", &self.features)?;
        map.serialize_entry("content", &self.content)?;
        map.serialize_entry("config", &projection)?;
        map.end()
    }
}
