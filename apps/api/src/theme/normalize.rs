use serde_json::{json, Map, Value};
use tracing::debug;

use crate::models::theme::{NormalizedTheme, PresetId, ThemeMode};
use crate::theme::presets::{available_theme_options_value, preset_config};
use crate::tree::merge;

/// Normalizes an arbitrary partial theme (or whole resume) onto the
/// `bostami`/light preset.
///
/// Accepted shapes:
/// - overrides at the root or nested under `config` (the latter wins)
/// - legacy `theme: "dark"` (the old schema stored only the mode name)
/// - anything else, including `None` or a non-object, yields the defaults
///
/// After merging, `theme.availableThemes` is filled in when empty, an
/// unknown or falsy `theme.id` becomes `bostami`, and `theme.mode` is clamped
/// to `light`/`dark`. A top-level section that is present but not an object
/// is reset to the preset section; deeper type mismatches are kept as-is.
pub fn merge_theme_defaults(partial: Option<&Value>) -> NormalizedTheme {
    let base = preset_config(PresetId::Bostami, ThemeMode::Light);

    let mut source = match partial {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    if let Some(Value::Object(config)) = source.get("config").cloned() {
        source.extend(config);
    }

    let legacy_mode = match source.get("theme") {
        Some(Value::String(mode)) => Some(mode.clone()),
        _ => None,
    };
    if let Some(mode) = &legacy_mode {
        debug!("Reinterpreting legacy theme string '{mode}' as a mode");
        source.insert("theme".to_string(), json!({ "mode": mode }));
    }

    let mut merged = match merge(&base, &Value::Object(source)) {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let mut section = |name: &str| match merged.remove(name) {
        Some(value @ Value::Object(_)) => value,
        other => {
            if let Some(value) = other {
                debug!("Resetting malformed '{name}' section ({value}) to preset defaults");
            }
            base.get(name).cloned().unwrap_or_else(|| json!({}))
        }
    };

    let mut theme = section("theme");
    let layout = section("layout");
    let features = section("features");
    let content = section("content");

    if let Value::Object(theme_map) = &mut theme {
        repair_theme(theme_map, legacy_mode.as_deref());
    }

    NormalizedTheme {
        theme,
        layout,
        features,
        content,
    }
}

fn repair_theme(theme: &mut Map<String, Value>, legacy_mode: Option<&str>) {
    let has_options = theme
        .get("availableThemes")
        .and_then(Value::as_array)
        .is_some_and(|options| !options.is_empty());
    if !has_options {
        theme.insert("availableThemes".to_string(), available_theme_options_value());
    }

    let id_is_known = theme
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(PresetId::is_known_theme_id);
    if !id_is_known {
        if let Some(id) = theme.get("id").filter(|id| !id.is_null()) {
            debug!("Replacing unknown theme id {id} with the default preset");
        }
        theme.insert("id".to_string(), json!(PresetId::Bostami.as_str()));
    }

    if let Some(mode) = legacy_mode {
        theme.insert("mode".to_string(), json!(mode));
    }

    let mode = ThemeMode::clamp(theme.get("mode"));
    theme.insert("mode".to_string(), json!(mode.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theme::COLOR_KEYS;

    fn defaults() -> Value {
        let preset = preset_config(PresetId::Bostami, ThemeMode::Light);
        let mut value = preset.clone();
        value["config"] = preset;
        value
    }

    #[test]
    fn test_missing_and_empty_input_yield_preset() {
        assert_eq!(merge_theme_defaults(None).to_value(), defaults());
        assert_eq!(merge_theme_defaults(Some(&json!({}))).to_value(), defaults());
        assert_eq!(merge_theme_defaults(Some(&json!("dark"))).to_value(), defaults());
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            json!({}),
            json!({"theme": "dark"}),
            json!({"config": {"theme": {"id": "ryancv", "mode": "dark"}, "layout": {"sidebarPosition": "right"}}}),
            json!({"theme": {"modes": {"light": {"primary": "#123456"}}}, "content": {"hero": {"headline": "Dana"}}}),
            json!({"layout": 7, "theme": {"id": "nope", "mode": "sepia"}}),
        ];
        for input in inputs {
            let once = merge_theme_defaults(Some(&input));
            let twice = merge_theme_defaults(Some(&once.to_value()));
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_legacy_string_theme() {
        let normalized = merge_theme_defaults(Some(&json!({"theme": "dark"})));
        assert_eq!(normalized.theme["mode"], "dark");
        assert_eq!(normalized.theme["id"], "bostami");

        let normalized = merge_theme_defaults(Some(&json!({"theme": "sepia"})));
        assert_eq!(normalized.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_mode_clamped_to_light_unless_exactly_dark() {
        for mode in [json!("Dark"), json!(1), json!(null), json!("midnight"), json!({})] {
            let normalized = merge_theme_defaults(Some(&json!({"theme": {"mode": mode}})));
            assert_eq!(normalized.theme["mode"], "light");
        }
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"mode": "dark"}})));
        assert_eq!(normalized.theme["mode"], "dark");
    }

    #[test]
    fn test_config_overrides_flatten_over_root() {
        let input = json!({
            "layout": {"sidebarPosition": "right"},
            "config": {"layout": {"showHeaderActions": false}},
        });
        let normalized = merge_theme_defaults(Some(&input));
        // Shallow flatten: the nested section replaces the root one before merging.
        assert_eq!(normalized.layout["sidebarPosition"], "left");
        assert_eq!(normalized.layout["showHeaderActions"], false);
    }

    #[test]
    fn test_partial_palette_keeps_all_color_keys() {
        let input = json!({"theme": {"modes": {"dark": {"primary": "#00FF00"}}}});
        let normalized = merge_theme_defaults(Some(&input));
        let dark = &normalized.theme["modes"]["dark"];
        assert_eq!(dark["primary"], "#00FF00");
        for key in COLOR_KEYS {
            assert!(dark[key].is_string());
            assert!(normalized.theme["modes"]["light"][key].is_string());
        }
    }

    #[test]
    fn test_ids_are_repaired() {
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"id": ""}})));
        assert_eq!(normalized.id(), "bostami");
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"id": "solarized"}})));
        assert_eq!(normalized.id(), "bostami");
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"id": "custom"}})));
        assert_eq!(normalized.id(), "custom");
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"id": "ryancv-fusion"}})));
        assert_eq!(normalized.id(), "ryancv-fusion");
    }

    #[test]
    fn test_empty_available_themes_refilled() {
        let normalized = merge_theme_defaults(Some(&json!({"theme": {"availableThemes": []}})));
        assert_eq!(normalized.theme["availableThemes"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_malformed_sections() {
        let input = json!({"theme": null, "layout": 5, "features": {"pdfTemplates": "none"}});
        let normalized = merge_theme_defaults(Some(&input));
        let preset = preset_config(PresetId::Bostami, ThemeMode::Light);
        assert_eq!(normalized.theme, preset["theme"]);
        assert_eq!(normalized.layout, preset["layout"]);
        // Nested mismatches survive.
        assert_eq!(normalized.features["pdfTemplates"], "none");
    }

    #[test]
    fn test_extra_keys_are_dropped_from_output() {
        let input = json!({"email": "a@b.co", "theme": {"mode": "dark"}});
        let value = merge_theme_defaults(Some(&input)).to_value();
        assert!(value.get("email").is_none());
        assert_eq!(value["config"]["theme"]["mode"], "dark");
    }
}
