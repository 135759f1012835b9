use axum::{extract::Path, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::models::theme::{NormalizedTheme, PresetSummary, ThemeMode, ThemeOption};
use crate::theme::normalize::merge_theme_defaults;
use crate::theme::presets::{available_theme_options, get_preset_config, preset_summaries};

#[derive(Serialize)]
pub struct PresetListResponse {
    pub options: Vec<ThemeOption>,
    pub presets: Vec<PresetSummary>,
}

/// GET /api/v1/themes/presets
pub async fn handle_list_presets() -> Json<PresetListResponse> {
    Json(PresetListResponse {
        options: available_theme_options(),
        presets: preset_summaries(),
    })
}

/// GET /api/v1/themes/presets/:id/:mode
pub async fn handle_get_preset(
    Path((id, mode)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    if mode.parse::<ThemeMode>().is_err() {
        return Err(AppError::Validation(format!("Unknown theme mode '{mode}'")));
    }
    let config = get_preset_config(&id, &mode).ok_or_else(|| {
        warn!(preset = %id, "Unknown theme preset requested");
        AppError::NotFound(format!("Theme preset '{id}' not found"))
    })?;
    Ok(Json(config))
}

/// POST /api/v1/themes/normalize
pub async fn handle_normalize_theme(Json(partial): Json<Value>) -> Json<NormalizedTheme> {
    Json(merge_theme_defaults(Some(&partial)))
}
