use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;
use crate::students::profile::{
    fetch_student, normalize_branch, validate_cgpa, validate_score,
};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub cgpa: Option<f64>,
    pub branch: Option<String>,
    pub tenth_score: Option<f64>,
    pub twelfth_score: Option<f64>,
}

/// GET /api/v1/students/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    Ok(Json(fetch_student(&state.db, student_id).await?))
}

/// PUT /api/v1/students/:id/profile
///
/// Replaces the academic fields the eligibility gate reads.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserRow>, AppError> {
    validate_cgpa(request.cgpa)?;
    validate_score("tenth_score", request.tenth_score)?;
    validate_score("twelfth_score", request.twelfth_score)?;
    let branch = normalize_branch(request.branch)?;

    fetch_student(&state.db, student_id).await?;

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET cgpa = $1, branch = $2, tenth_score = $3, twelfth_score = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(request.cgpa)
    .bind(branch)
    .bind(request.tenth_score)
    .bind(request.twelfth_score)
    .bind(student_id)
    .fetch_one(&state.db)
    .await?;

    info!("Updated profile for student {student_id}");
    Ok(Json(user))
}
