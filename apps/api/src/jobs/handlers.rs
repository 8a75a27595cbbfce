use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::posting::{describe_branch, fetch_job, CreateJobRequest};
use crate::matching::job_matcher::{match_jobs_with_document, JobListing};
use crate::models::job::JobRow;
use crate::resumes::handlers::fetch_owned_resume;
use crate::skills::role_tagger::detect_job_roles;
use crate::state::AppState;
use crate::students::profile::{fetch_recruiter, fetch_student};

#[derive(Deserialize)]
pub struct EligibleJobsQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub resume_id: Option<Uuid>,
}

/// POST /api/v1/jobs
///
/// Suitable roles are tagged once here and stored with the posting.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let recruiter = fetch_recruiter(&state.db, req.user_id).await?;
    let job = req.validate()?;
    let suitable_roles = detect_job_roles(&state.catalog, &job.requirements);

    let row = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (recruiter_id, title, description, min_cgpa, branch,
             requirements, suitable_roles, custom_questions)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(recruiter.id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(job.min_cgpa)
    .bind(&job.branch)
    .bind(&job.requirements)
    .bind(&suitable_roles)
    .bind(SqlJson(&job.custom_questions))
    .fetch_one(&state.db)
    .await?;

    info!(
        "Job {} posted by {} (roles: {}, branch: {})",
        row.id,
        recruiter.id,
        suitable_roles.join(","),
        describe_branch(row.branch.as_deref())
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY posted_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(fetch_job(&state.db, job_id).await?))
}

/// GET /api/v1/jobs/eligible
///
/// Eligible jobs for a student, ranked against the chosen resume's analysis.
/// Without a resume (or with an unanalyzed one) the eligible jobs come back in
/// posting order.
pub async fn handle_eligible_jobs(
    State(state): State<AppState>,
    Query(params): Query<EligibleJobsQuery>,
) -> Result<Json<JobListing<JobRow>>, AppError> {
    let student = fetch_student(&state.db, params.user_id).await?;
    let analysis = match params.resume_id {
        Some(resume_id) => fetch_owned_resume(&state.db, resume_id, student.id)
            .await?
            .skill_analysis,
        None => None,
    };

    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY posted_at DESC")
        .fetch_all(&state.db)
        .await?;

    let listing = match_jobs_with_document(&student.profile(), analysis.as_ref(), jobs);
    info!(
        "Student {}: {} eligible jobs, {} matched",
        student.id, listing.total_jobs, listing.matched_count
    );
    Ok(Json(listing))
}
