use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::onboarding::field_errors::SubmitOutcome;
use crate::onboarding::steps::{Step, StepMeta};
use crate::onboarding::validation::validate_step;
use crate::resume::defaults::merge_resume_defaults;
use crate::state::AppState;

const FORM_ERROR_MESSAGE: &str = "Please correct the highlighted fields.";

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub resume: Value,
}

#[derive(Deserialize)]
pub struct TransformRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub values: Value,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub values: Value,
}

#[derive(Deserialize)]
pub struct ReloadRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub resume: Value,
}

fn parse_step(raw: &str) -> Result<Step, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Onboarding step '{raw}' not found")))
}

/// GET /api/v1/onboarding/steps
pub async fn handle_list_steps() -> Json<Vec<StepMeta>> {
    Json(Step::SEQUENCE.iter().map(Step::meta).collect())
}

/// POST /api/v1/onboarding/steps/:step/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<Value>, AppError> {
    let step = parse_step(&step)?;
    let record = merge_resume_defaults(Some(&req.resume));
    let defaults = match req.user_id {
        Some(user_id) => state.drafts.defaults_for(user_id, step, &record).await,
        None => step.extract(&record),
    };
    Ok(Json(defaults))
}

/// POST /api/v1/onboarding/steps/:step/transform
pub async fn handle_transform(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Json(req): Json<TransformRequest>,
) -> Result<Json<Value>, AppError> {
    let step = parse_step(&step)?;

    let report = validate_step(step, &req.values);
    if !report.passed {
        debug!(%step, "Step values rejected by validation");
        return Err(AppError::UnprocessableEntity(SubmitOutcome::failed(
            &report.errors,
            FORM_ERROR_MESSAGE,
        )));
    }

    let payload = step.transform(&req.values);
    if let Some(user_id) = req.user_id {
        state.drafts.update(user_id, step, req.values).await;
    }
    Ok(Json(payload))
}

/// PUT /api/v1/onboarding/drafts/:step
pub async fn handle_put_draft(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Json(req): Json<DraftRequest>,
) -> Result<StatusCode, AppError> {
    let step = parse_step(&step)?;
    state.drafts.update(req.user_id, step, req.values).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/onboarding/drafts/:step
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(step): Path<String>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let step = parse_step(&step)?;
    state
        .drafts
        .get(params.user_id, step)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No draft for step '{step}'")))
}

/// POST /api/v1/onboarding/drafts/reload
pub async fn handle_reload_drafts(
    State(state): State<AppState>,
    Json(req): Json<ReloadRequest>,
) -> Json<BTreeMap<&'static str, Value>> {
    let record = merge_resume_defaults(Some(&req.resume));
    Json(state.drafts.reload(req.user_id, &record).await)
}
