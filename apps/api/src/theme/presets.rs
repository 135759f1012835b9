//! Built-in theme presets.
//!
//! Each preset is a complete `{theme, layout, features, content}` tree in a
//! light and a dark variant. The fusion presets are composed from the two
//! base presets with [`merge`] the first time the catalog is touched; after
//! that the table is read-only and every accessor hands out a fresh copy.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde_json::{json, Value};

use crate::models::theme::{PresetId, PresetSummary, ThemeMode, ThemeOption, CUSTOM_THEME_ID};
use crate::tree::merge;

struct PresetVariants {
    light: Value,
    dark: Value,
}

impl PresetVariants {
    fn variant(&self, mode: ThemeMode) -> &Value {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

static CATALOG: LazyLock<HashMap<PresetId, PresetVariants>> = LazyLock::new(build_catalog);

/// Builds the catalog if it hasn't been built yet. Returns the preset count.
pub fn warm_catalog() -> usize {
    LazyLock::force(&CATALOG).len()
}

/// Options offered by the theme picker: every preset plus `custom`.
pub fn available_theme_options() -> Vec<ThemeOption> {
    PresetId::ALL
        .iter()
        .map(|p| ThemeOption {
            id: p.as_str(),
            label: p.label(),
        })
        .chain(std::iter::once(ThemeOption {
            id: CUSTOM_THEME_ID,
            label: "Custom Theme",
        }))
        .collect()
}

pub fn available_theme_options_value() -> Value {
    serde_json::to_value(available_theme_options()).unwrap_or_else(|_| json!([]))
}

pub fn preset_summaries() -> Vec<PresetSummary> {
    PresetId::ALL
        .iter()
        .map(|&id| PresetSummary {
            id,
            label: id.label(),
            description: id.description(),
        })
        .collect()
}

/// Typed lookup. Always succeeds: every preset defines both modes.
pub fn preset_config(id: PresetId, mode: ThemeMode) -> Value {
    let mut config = CATALOG
        .get(&id)
        .map(|variants| variants.variant(mode).clone())
        .unwrap_or(Value::Null);
    set_theme_field(&mut config, "id", json!(id.as_str()));
    config
}

/// Returns a copy of the `mode` variant of preset `id`, or `None` when
/// either is unknown. `theme.id` is forced to `id` on the copy.
pub fn get_preset_config(id: &str, mode: &str) -> Option<Value> {
    let preset: PresetId = id.parse().ok()?;
    let mode: ThemeMode = mode.parse().ok()?;
    Some(preset_config(preset, mode))
}

fn set_theme_field(config: &mut Value, key: &str, value: Value) {
    if let Some(theme) = config.get_mut("theme").and_then(Value::as_object_mut) {
        theme.insert(key.to_string(), value);
    }
}

fn apply_preset_mode(base: &Value, id: PresetId, mode: ThemeMode, overrides: &Value) -> Value {
    let mut variant = base.clone();
    set_theme_field(&mut variant, "id", json!(id.as_str()));
    set_theme_field(&mut variant, "mode", json!(mode.as_str()));
    set_theme_field(&mut variant, "availableThemes", available_theme_options_value());
    merge(&variant, overrides)
}

fn base_theme(
    id: PresetId,
    background_overlay: Value,
    modes: Value,
    palette_variants: Value,
    gradients: Value,
    animations: Value,
) -> Value {
    json!({
        "backgroundOverlay": background_overlay,
        "id": id.as_str(),
        "mode": "light",
        "availableThemes": available_theme_options_value(),
        "modes": modes,
        "paletteVariants": palette_variants,
        "gradients": gradients,
        "animations": animations,
    })
}

fn bundle(theme: Value, layout: Value, features: Value, content: Value) -> Value {
    json!({
        "theme": theme,
        "layout": layout,
        "features": features,
        "content": content,
    })
}

fn bostami_theme() -> Value {
    base_theme(
        PresetId::Bostami,
        json!({
            "enabled": true,
            "icon": "\u{2726}",
            "color": "secondary",
            "density": 120,
            "size": 18,
            "opacity": 0.14,
            "animation": { "speed": 22, "variance": 16 },
        }),
        json!({
            "light": {
                "primary": "#FA5252",
                "secondary": "#DD2476",
                "background": "#F3F6F6",
                "surface": "#FFFFFF",
                "surfaceMuted": "#F3F6F6",
                "surfaceElevation": "#FFFFFF",
                "text": "#111111",
                "textMuted": "#7B7B7B",
                "border": "#E3E3E3",
                "emphasis": "#1D1D1D",
            },
            "dark": {
                "primary": "#FA5252",
                "secondary": "#DD2476",
                "background": "#111111",
                "surface": "#1D1D1D",
                "surfaceMuted": "#212425",
                "surfaceElevation": "#1D1D1D",
                "text": "#FFFFFF",
                "textMuted": "#A6A6A6",
                "border": "#333333",
                "emphasis": "#FAFAFA",
            },
        }),
        json!([
            "#FFF0F0", "#FFF3FC", "#E9FAFF", "#FFFAE9", "#F4F4FF", "#FFF0F8", "#EEFBFF",
            "#FCF4FF", "#F2F4FF",
        ]),
        json!({
            "primary": { "angle": 135, "stops": ["#FA5252", "#DD2476"] },
            "primaryHover": { "angle": 135, "stops": ["#DD2476", "#FA5252"] },
        }),
        json!({
            "preset": "bostami",
            "card": {
                "initial": { "opacity": 0, "translateY": 20 },
                "animate": { "opacity": 1, "translateY": 0 },
                "transition": { "duration": 0.4, "ease": "easeOut" },
            },
            "section": {
                "initial": { "opacity": 0, "translateY": 40 },
                "animate": { "opacity": 1, "translateY": 0 },
                "transition": { "duration": 0.6, "ease": "easeOut" },
            },
        }),
    )
}

fn bostami_layout() -> Value {
    json!({
        "sidebarPosition": "left",
        "showSidebarProfileCard": true,
        "showHeaderActions": true,
        "enableStickySidebar": true,
        "mobileMenuCollapsed": true,
        "panels": {
            "contact": { "visible": true },
            "portfolio": { "visible": true, "displayFilters": true },
        },
    })
}

fn bostami_features() -> Value {
    json!({
        "allowThemeToggle": true,
        "autoApplyConfigTheme": true,
        "persistThemeMode": true,
        "animations": { "enabled": true, "preset": "bostami" },
        "cvTemplate": "bostami",
        "pdfTemplates": [
            { "id": "bostami", "label": "Bostami Classic" },
            { "id": "ryancv", "label": "RyanCV" },
            { "id": "custom", "label": "Custom Theme" },
        ],
    })
}

fn bostami_content() -> Value {
    json!({
        "hero": {
            "greeting": "Hello, I'm",
            "headline": "Ion Mindru",
            "subtitle": "Full Stack Developer",
            "summary": "Building responsive web applications with a focus on delightful user interfaces.",
        },
    })
}

fn ryan_theme() -> Value {
    base_theme(
        PresetId::RyanCv,
        json!({
            "enabled": true,
            "icon": "\u{25AA}",
            "color": "primary",
            "density": 90,
            "size": 14,
            "opacity": 0.12,
            "animation": { "speed": 18, "variance": 12 },
        }),
        json!({
            "light": {
                "primary": "#2563EB",
                "secondary": "#14B8A6",
                "background": "#EAEEF5",
                "surface": "#FFFFFF",
                "surfaceMuted": "#F3F4F6",
                "surfaceElevation": "#FFFFFF",
                "text": "#1E293B",
                "textMuted": "#64748B",
                "border": "#D1D5DB",
                "emphasis": "#0F172A",
            },
            "dark": {
                "primary": "#38BDF8",
                "secondary": "#2563EB",
                "background": "#0F172A",
                "surface": "#111827",
                "surfaceMuted": "#1E293B",
                "surfaceElevation": "#111827",
                "text": "#E2E8F0",
                "textMuted": "#94A3B8",
                "border": "#1E293B",
                "emphasis": "#F8FAFC",
            },
        }),
        json!([
            "#E0F2FE", "#CCFBF1", "#DBEAFE", "#D1FAE5", "#E2E8F0", "#F8FAFC", "#DCFCE7",
            "#E0E7FF", "#C7D2FE",
        ]),
        json!({
            "primary": { "angle": 145, "stops": ["#2563EB", "#14B8A6"] },
            "primaryHover": { "angle": 145, "stops": ["#14B8A6", "#2563EB"] },
        }),
        json!({
            "preset": "ryancv",
            "card": {
                "initial": { "opacity": 0, "translateY": 16 },
                "animate": { "opacity": 1, "translateY": 0 },
                "transition": { "duration": 0.45, "ease": "easeOut" },
            },
            "section": {
                "initial": { "opacity": 0, "translateY": 32 },
                "animate": { "opacity": 1, "translateY": 0 },
                "transition": { "duration": 0.55, "ease": "easeOut" },
            },
        }),
    )
}

fn ryan_layout() -> Value {
    json!({
        "sidebarPosition": "right",
        "showSidebarProfileCard": false,
        "showHeaderActions": true,
        "enableStickySidebar": false,
        "mobileMenuCollapsed": false,
        "panels": {
            "contact": { "visible": true },
            "portfolio": { "visible": true, "displayFilters": true },
        },
    })
}

fn ryan_features() -> Value {
    json!({
        "allowThemeToggle": true,
        "autoApplyConfigTheme": true,
        "persistThemeMode": true,
        "animations": { "enabled": true, "preset": "ryancv" },
        "cvTemplate": "ryancv",
        "pdfTemplates": [
            { "id": "ryancv", "label": "RyanCV" },
            { "id": "bostami", "label": "Bostami Classic" },
            { "id": "custom", "label": "Custom Theme" },
        ],
    })
}

fn ryan_content() -> Value {
    json!({
        "hero": {
            "greeting": "Hey there, I'm",
            "headline": "Alex Rivera",
            "subtitle": "Product Designer",
            "summary": "Crafting human-centered experiences with a balance of visual polish and usability.",
        },
    })
}

fn build_catalog() -> HashMap<PresetId, PresetVariants> {
    let bostami = bostami_theme();
    let ryan = ryan_theme();
    let no_overrides = json!({});

    let bostami_base = bundle(
        bostami.clone(),
        bostami_layout(),
        bostami_features(),
        bostami_content(),
    );
    let ryan_base = bundle(ryan.clone(), ryan_layout(), ryan_features(), ryan_content());

    let bostami_light = &bostami["modes"]["light"];
    let bostami_dark = &bostami["modes"]["dark"];
    let ryan_light = &ryan["modes"]["light"];
    let ryan_dark = &ryan["modes"]["dark"];

    // Bostami layout and gradients over RyanCV surfaces.
    let bostami_fusion_base = bundle(
        bostami.clone(),
        merge(
            &bostami_layout(),
            &json!({
                "sidebarPosition": "left",
                "enableStickySidebar": true,
                "panels": { "portfolio": { "displayFilters": true } },
            }),
        ),
        merge(
            &bostami_features(),
            &json!({ "animations": { "preset": "fusion" }, "cvTemplate": "bostami" }),
        ),
        merge(
            &bostami_content(),
            &json!({
                "hero": {
                    "subtitle": "Fusion UI Engineer",
                    "summary": "Blending bold gradients with refined composition for portfolios that stand out.",
                },
            }),
        ),
    );
    let bostami_fusion_light = apply_preset_mode(
        &bostami_fusion_base,
        PresetId::BostamiFusion,
        ThemeMode::Light,
        &json!({
            "theme": {
                "modes": {
                    "light": merge(bostami_light, &json!({
                        "background": ryan_dark["background"],
                        "surface": ryan_dark["surface"],
                        "surfaceMuted": ryan_light["surfaceMuted"],
                        "surfaceElevation": ryan_dark["surfaceElevation"],
                        "text": ryan_dark["text"],
                        "textMuted": ryan_dark["textMuted"],
                        "border": ryan_light["border"],
                        "emphasis": ryan_dark["emphasis"],
                    })),
                },
                "animations": { "preset": "fusion" },
            },
        }),
    );
    let bostami_fusion_dark = apply_preset_mode(
        &bostami_fusion_light,
        PresetId::BostamiFusion,
        ThemeMode::Dark,
        &json!({
            "theme": {
                "modes": {
                    "dark": merge(bostami_dark, &json!({
                        "background": ryan_dark["background"],
                        "surface": ryan_dark["surface"],
                        "surfaceMuted": ryan_dark["surfaceMuted"],
                        "surfaceElevation": ryan_dark["surfaceElevation"],
                        "text": ryan_dark["text"],
                        "textMuted": ryan_dark["textMuted"],
                        "border": ryan_dark["border"],
                        "emphasis": ryan_dark["emphasis"],
                    })),
                },
            },
        }),
    );

    // RyanCV structure with Bostami accents.
    let ryan_fusion_base = bundle(
        ryan.clone(),
        merge(
            &ryan_layout(),
            &json!({
                "sidebarPosition": "right",
                "showSidebarProfileCard": true,
                "enableStickySidebar": true,
            }),
        ),
        merge(
            &ryan_features(),
            &json!({ "animations": { "preset": "fusion" }, "cvTemplate": "ryancv" }),
        ),
        merge(
            &ryan_content(),
            &json!({
                "hero": {
                    "headline": "Morgan Lee",
                    "subtitle": "Creative Technologist",
                    "summary": "Pairing structured layouts with energetic gradients for expressive resumes.",
                },
            }),
        ),
    );
    let ryan_fusion_light = apply_preset_mode(
        &ryan_fusion_base,
        PresetId::RyanCvFusion,
        ThemeMode::Light,
        &json!({
            "theme": {
                "modes": {
                    "light": merge(ryan_light, &json!({
                        "primary": bostami_light["primary"],
                        "secondary": bostami_light["secondary"],
                    })),
                    "dark": merge(ryan_dark, &json!({
                        "primary": bostami_dark["primary"],
                        "secondary": bostami_dark["secondary"],
                    })),
                },
                "gradients": bostami["gradients"],
                "paletteVariants": bostami["paletteVariants"],
                "animations": { "preset": "fusion" },
            },
        }),
    );
    let ryan_fusion_dark = apply_preset_mode(
        &ryan_fusion_light,
        PresetId::RyanCvFusion,
        ThemeMode::Dark,
        &no_overrides,
    );

    let plain = |base: &Value, id: PresetId| PresetVariants {
        light: apply_preset_mode(base, id, ThemeMode::Light, &no_overrides),
        dark: apply_preset_mode(base, id, ThemeMode::Dark, &no_overrides),
    };

    let mut catalog = HashMap::new();
    catalog.insert(PresetId::Bostami, plain(&bostami_base, PresetId::Bostami));
    catalog.insert(PresetId::RyanCv, plain(&ryan_base, PresetId::RyanCv));
    catalog.insert(
        PresetId::BostamiFusion,
        PresetVariants {
            light: bostami_fusion_light,
            dark: bostami_fusion_dark,
        },
    );
    catalog.insert(
        PresetId::RyanCvFusion,
        PresetVariants {
            light: ryan_fusion_light,
            dark: ryan_fusion_dark,
        },
    );
    catalog
}
