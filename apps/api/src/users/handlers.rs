use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;
use crate::students::profile::{fetch_recruiter, fetch_user};
use crate::users::registration::{normalize_company, RegisterRequest};

#[derive(Debug, Deserialize)]
pub struct UpdateRecruiterProfileRequest {
    pub company: Option<String>,
}

/// POST /api/v1/users
///
/// Creates a student or recruiter account. Emails are unique.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let user = req.validate()?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, name, role, company)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&user.email)
    .bind(&user.name)
    .bind(user.role)
    .bind(&user.company)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("User {} already exists", user.email))
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Registered {} {}", row.role, row.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    Ok(Json(fetch_user(&state.db, user_id).await?))
}

/// GET /api/v1/recruiters/:id/profile
pub async fn handle_get_recruiter_profile(
    State(state): State<AppState>,
    Path(recruiter_id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    Ok(Json(fetch_recruiter(&state.db, recruiter_id).await?))
}

/// PUT /api/v1/recruiters/:id/profile
pub async fn handle_update_recruiter_profile(
    State(state): State<AppState>,
    Path(recruiter_id): Path<Uuid>,
    Json(req): Json<UpdateRecruiterProfileRequest>,
) -> Result<Json<UserRow>, AppError> {
    let company = normalize_company(req.company)?;
    fetch_recruiter(&state.db, recruiter_id).await?;

    let user = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET company = $1 WHERE id = $2 RETURNING *",
    )
    .bind(company)
    .bind(recruiter_id)
    .fetch_one(&state.db)
    .await?;

    info!("Updated company for recruiter {recruiter_id}");
    Ok(Json(user))
}
