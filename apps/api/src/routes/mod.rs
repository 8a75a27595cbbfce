pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::{applications, jobs, matching, resumes, skills, statistics, students, users};

/// Multipart framing on top of the PDF itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handlers::handle_register))
        .route("/api/v1/users/:id", get(users::handlers::handle_get_user))
        .route(
            "/api/v1/recruiters/:id/profile",
            get(users::handlers::handle_get_recruiter_profile)
                .put(users::handlers::handle_update_recruiter_profile),
        )
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handlers::handle_upload_resume)
                .get(resumes::handlers::handle_list_resumes)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/resumes/analyze",
            post(skills::handlers::handle_analyze_text),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            post(jobs::handlers::handle_create_job).get(jobs::handlers::handle_list_jobs),
        )
        .route("/api/v1/jobs/eligible", get(jobs::handlers::handle_eligible_jobs))
        .route("/api/v1/jobs/roles", post(skills::handlers::handle_detect_roles))
        .route(
            "/api/v1/jobs/eligibility",
            post(matching::handlers::handle_check_eligibility),
        )
        .route("/api/v1/jobs/match", post(matching::handlers::handle_match_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handlers::handle_get_job))
        // Applications
        .route("/api/v1/applications", post(applications::handlers::handle_apply))
        .route(
            "/api/v1/applications/mine",
            get(applications::handlers::handle_my_applications),
        )
        .route(
            "/api/v1/applications/job/:job_id",
            get(applications::handlers::handle_job_applications),
        )
        .route(
            "/api/v1/applications/:id/status",
            put(applications::handlers::handle_update_status),
        )
        // Students
        .route(
            "/api/v1/students/:id/profile",
            get(students::handlers::handle_get_profile)
                .put(students::handlers::handle_update_profile),
        )
        // Statistics
        .route(
            "/api/v1/statistics/placements",
            get(statistics::handlers::handle_placement_stats),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::skills::catalog::SkillCatalog;
    use crate::storage::DisabledBlobStore;

    /// None of the routes exercised here touch the database, so the pool never connects.
    fn test_router() -> Router {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState {
            db,
            config,
            catalog: Arc::new(SkillCatalog::default()),
            blobs: Arc::new(DisabledBlobStore),
        })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "placement-api");
    }

    #[tokio::test]
    async fn test_analyze_text_route() {
        let (status, body) = post_json(
            "/api/v1/resumes/analyze",
            json!({"text": "Built a Django project in Python\nInternship: 6 months using Python"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skillScores"]["python"]["frequency"], 3);
        assert_eq!(body["skillScores"]["python"]["internshipMonths"], 6);
        assert!(body["bestRoles"].as_array().unwrap().iter().any(|r| r == "backend"));
    }

    #[tokio::test]
    async fn test_detect_roles_route_falls_back_to_default() {
        let (status, body) =
            post_json("/api/v1/jobs/roles", json!({"requirements": ["Excel"]})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["full-stack"]));
    }

    #[tokio::test]
    async fn test_detect_roles_route_returns_bare_list() {
        let (status, body) =
            post_json("/api/v1/jobs/roles", json!({"requirements": ["ML"]})).await;
        assert_eq!(status, StatusCode::OK);
        let roles = body.as_array().unwrap();
        assert!(roles.iter().any(|r| r == "data-scientist"));
    }

    #[tokio::test]
    async fn test_eligibility_route_reports_every_reason() {
        let (status, body) = post_json(
            "/api/v1/jobs/eligibility",
            json!({
                "student": {"cgpa": 6.5, "branch": "Mechanical"},
                "job": {"minCgpa": 7.0, "branch": "CSE, IT"}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["eligible"], false);
        assert_eq!(body["reasons"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_match_route_ranks_matching_jobs_first() {
        let (status, body) = post_json(
            "/api/v1/jobs/match",
            json!({
                "student": {"cgpa": 8.0, "branch": "CSE"},
                "resumeAnalysis": {"bestRoles": ["frontend"]},
                "jobs": [
                    {"id": 1, "title": "Data", "suitableRoles": ["data-science"]},
                    {"id": 2, "title": "UI", "suitableRoles": ["frontend"]},
                    {"id": 3, "title": "Gated", "minCgpa": 9.0, "suitableRoles": ["frontend"]}
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalJobs"], 2);
        assert_eq!(body["matchedCount"], 1);
        assert_eq!(body["jobs"][0]["id"], 2);
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let (status, body) = post_json(
            "/api/v1/users",
            json!({"email": "a@college.edu", "name": "Asha", "role": "admin"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let (status, body) = post_json(
            "/api/v1/users",
            json!({"email": "not-an-email", "name": "Asha", "role": "student"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_recruiter_profile_rejects_oversized_company() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/recruiters/{}/profile", uuid::Uuid::new_v4()))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"company": "c".repeat(101)}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::builder().uri("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
