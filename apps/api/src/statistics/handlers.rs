use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::resumes::handlers::UserIdQuery;
use crate::state::AppState;
use crate::statistics::summary::{summarize_placements, PlacementRecord, YearStats};
use crate::students::profile::fetch_recruiter;

#[derive(Serialize)]
pub struct PlacementStatsResponse {
    pub total_placements: usize,
    pub by_year: BTreeMap<String, YearStats>,
}

/// GET /api/v1/statistics/placements
pub async fn handle_placement_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PlacementStatsResponse>, AppError> {
    fetch_recruiter(&state.db, params.user_id).await?;

    let records = sqlx::query_as::<_, PlacementRecord>(
        r#"
        SELECT s.name AS student_name,
               s.branch AS branch,
               j.title AS job_title,
               COALESCE(r.company, r.name) AS posted_by,
               a.applied_at AS applied_at
        FROM applications a
        JOIN users s ON s.id = a.student_id
        JOIN jobs j ON j.id = a.job_id
        JOIN users r ON r.id = j.recruiter_id
        WHERE a.status = 'accepted'
        ORDER BY a.applied_at ASC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(PlacementStatsResponse {
        total_placements: records.len(),
        by_year: summarize_placements(&records),
    }))
}
