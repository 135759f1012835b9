use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::onboarding::field_errors::SubmitOutcome;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {}", .0.message.as_deref().unwrap_or_default())]
    UnprocessableEntity(SubmitOutcome),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(outcome) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                outcome.message.clone().unwrap_or_default(),
            ),
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        // Inline field errors replace the banner; the banner is null then.
        if let AppError::UnprocessableEntity(outcome) = &self {
            error["fieldErrors"] = json!(outcome.field_errors);
            error["banner"] = json!(outcome.banner());
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
