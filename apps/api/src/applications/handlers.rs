use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::applications::review::{validate_answers, ApplicationStatus};
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::jobs::posting::fetch_job;
use crate::matching::eligibility::check_eligibility;
use crate::models::application::{ApplicationRow, CustomAnswer};
use crate::resumes::handlers::{fetch_owned_resume, UserIdQuery};
use crate::state::AppState;
use crate::students::profile::{fetch_recruiter, fetch_student};

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub resume_id: Uuid,
    #[serde(default)]
    pub custom_answers: Vec<CustomAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub user_id: Uuid,
    pub status: String,
}

/// POST /api/v1/applications
///
/// Re-checks eligibility against the stored profile; every failing check is
/// returned in the 422 body.
pub async fn handle_apply(
    State(state): State<AppState>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let student = fetch_student(&state.db, req.user_id).await?;
    let job = fetch_job(&state.db, req.job_id).await?;
    let resume = fetch_owned_resume(&state.db, req.resume_id, student.id).await?;

    let report = check_eligibility(&student.profile(), &job);
    if !report.eligible {
        info!("Student {} rejected at apply gate for job {}", student.id, job.id);
        return Err(AppError::NotEligible {
            reasons: report.reasons,
        });
    }

    let answers = validate_answers(&job.custom_questions, req.custom_answers)?;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (job_id, student_id, resume_id, status, custom_answers)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(job.id)
    .bind(student.id)
    .bind(resume.id)
    .bind(ApplicationStatus::Pending.as_str())
    .bind(SqlJson(&answers))
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("You have already applied to this job".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("Application {} created: student {} -> job {}", row.id, student.id, job.id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications/mine
pub async fn handle_my_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let student = fetch_student(&state.db, params.user_id).await?;
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE student_id = $1 ORDER BY applied_at DESC",
    )
    .bind(student.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/applications/job/:job_id
///
/// Only the recruiter who posted the job may list its applications.
pub async fn handle_job_applications(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let recruiter = fetch_recruiter(&state.db, params.user_id).await?;
    let job = fetch_job(&state.db, job_id).await?;
    if job.recruiter_id != recruiter.id {
        return Err(AppError::Forbidden);
    }

    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE job_id = $1 ORDER BY applied_at ASC",
    )
    .bind(job.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// PUT /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let status: ApplicationStatus = req.status.parse()?;
    let recruiter = fetch_recruiter(&state.db, req.user_id).await?;

    let application =
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Application {application_id} not found"))
            })?;

    let job = fetch_job(&state.db, application.job_id).await?;
    if job.recruiter_id != recruiter.id {
        return Err(AppError::Forbidden);
    }

    let row = sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(application.id)
    .fetch_one(&state.db)
    .await?;

    info!("Application {} marked {status} by {}", row.id, recruiter.id);
    Ok(Json(row))
}
