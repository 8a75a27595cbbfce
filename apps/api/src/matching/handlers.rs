//! Axum route handlers exposing the eligibility gate and the listing matcher
//! over caller-supplied data.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::matching::eligibility::{
    check_eligibility, EligibilityCriteria, EligibilityReport, JobEligibilityCriteria,
    StudentProfile,
};
use crate::matching::job_matcher::{match_jobs_with_document, JobListing, MatchableJob};

#[derive(Debug, Deserialize)]
pub struct EligibilityRequest {
    pub student: StudentProfile,
    pub job: JobEligibilityCriteria,
}

/// A job as posted to the match endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateJob {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "min_cgpa")]
    pub min_cgpa: Option<f64>,
    #[serde(default, alias = "branchSpec")]
    pub branch: Option<String>,
    #[serde(default, alias = "suitable_roles")]
    pub suitable_roles: Vec<String>,
}

impl EligibilityCriteria for CandidateJob {
    fn min_cgpa(&self) -> Option<f64> {
        self.min_cgpa
    }

    fn branch_spec(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

impl MatchableJob for CandidateJob {
    fn suitable_roles(&self) -> &[String] {
        &self.suitable_roles
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub student: StudentProfile,
    /// Stored analysis document; read leniently.
    #[serde(default, alias = "resume_analysis")]
    pub resume_analysis: Option<Value>,
    pub jobs: Vec<CandidateJob>,
}

/// POST /api/v1/jobs/eligibility
pub async fn handle_check_eligibility(
    Json(request): Json<EligibilityRequest>,
) -> Result<Json<EligibilityReport>, AppError> {
    Ok(Json(check_eligibility(&request.student, &request.job)))
}

/// POST /api/v1/jobs/match
pub async fn handle_match_jobs(
    Json(request): Json<MatchRequest>,
) -> Result<Json<JobListing<CandidateJob>>, AppError> {
    let listing = match_jobs_with_document(
        &request.student,
        request.resume_analysis.as_ref(),
        request.jobs,
    );
    Ok(Json(listing))
}
