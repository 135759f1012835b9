use axum::Json;
use serde_json::Value;

use crate::models::resume::ResumeRecord;
use crate::resume::defaults::merge_resume_defaults;

/// POST /api/v1/resumes/normalize
pub async fn handle_normalize_resume(Json(resume): Json<Value>) -> Json<ResumeRecord> {
    Json(merge_resume_defaults(Some(&resume)))
}
