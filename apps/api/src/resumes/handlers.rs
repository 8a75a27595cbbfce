use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::upload::{extract_pdf_text, UploadForm, UploadedFile};
use crate::skills::extractor::analyze;
use crate::state::AppState;
use crate::storage::{discard_on_error, mirror_analysis, resume_pdf_key};
use crate::students::profile::fetch_student;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Loads a resume and checks it belongs to `student_id`.
pub async fn fetch_owned_resume(
    pool: &PgPool,
    resume_id: Uuid,
    student_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
        .bind(resume_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    if resume.student_id != student_id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "user_id" | "title" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid {name} field: {e}")))?;
                if name == "user_id" {
                    form.user_id = Some(value);
                } else {
                    form.title = Some(value);
                }
            }
            "file" | "resume" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid file field: {e}")))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/v1/resumes (multipart: user_id, title, file)
///
/// Stores the PDF, analyzes its text and keeps the analysis with the row. An
/// unreadable PDF is still saved, without analysis.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let upload = read_form(multipart)
        .await?
        .validate(state.config.max_resume_bytes)?;
    let student = fetch_student(&state.db, upload.student_id).await?;
    let resume_id = Uuid::new_v4();

    let analysis = match extract_pdf_text(upload.file.bytes.clone()).await {
        Ok(text) => Some(analyze(&state.catalog, &text)),
        Err(e) => {
            warn!("Resume {resume_id}: text extraction failed, saving without analysis: {e}");
            None
        }
    };
    let document = analysis
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(anyhow::Error::from)?;

    let storage_key = state
        .blobs
        .put(
            &resume_pdf_key(student.id, resume_id),
            upload.file.bytes,
            "application/pdf",
        )
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    // The stored PDF is removed again if the row insert fails.
    let insert = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, student_id, title, storage_key, skill_analysis)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(student.id)
    .bind(&upload.title)
    .bind(&storage_key)
    .bind(&document)
    .fetch_one(&state.db);
    let row = discard_on_error(state.blobs.as_ref(), storage_key.as_deref(), insert).await?;

    if let Some(analysis) = &analysis {
        if analysis.is_empty() {
            info!("Resume {resume_id}: no catalog skills recognised");
        }
        if let Err(e) = mirror_analysis(state.blobs.as_ref(), resume_id, analysis).await {
            warn!("Resume {resume_id}: analysis mirror failed: {e}");
        }
        info!(
            "Resume {resume_id} analyzed for student {}: best roles [{}]",
            student.id,
            analysis.best_roles.join(",")
        );
    }

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let student = fetch_student(&state.db, params.user_id).await?;
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE student_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(student.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(resumes))
}
