//! Axum route handlers exposing the resume analyzer and role auto-tagger directly.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::skills::extractor::{analyze, ResumeAnalysis};
use crate::skills::role_tagger::detect_job_roles;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectRolesRequest {
    pub requirements: Vec<String>,
}

/// POST /api/v1/resumes/analyze
///
/// Analyzes already-extracted resume text. Empty text is valid and yields zero scores.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    Ok(Json(analyze(&state.catalog, &request.text)))
}

/// POST /api/v1/jobs/roles
///
/// Responds with the bare role list, best match first.
pub async fn handle_detect_roles(
    State(state): State<AppState>,
    Json(request): Json<DetectRolesRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(detect_job_roles(&state.catalog, &request.requirements)))
}
