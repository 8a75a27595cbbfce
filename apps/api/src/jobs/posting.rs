//! Job posting input: normalization and validation before a job is stored.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::eligibility::allowed_branches;
use crate::models::job::{CustomQuestion, JobRow, QuestionKind};
use crate::students::profile::{normalize_branch, validate_cgpa};

const TITLE_LEN: (usize, usize) = (5, 100);
const DESCRIPTION_LEN: (usize, usize) = (10, 2000);

/// Requirements arrive either as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for RequirementsInput {
    fn default() -> Self {
        RequirementsInput::List(Vec::new())
    }
}

impl RequirementsInput {
    /// Trimmed, non-blank requirement strings in input order.
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            RequirementsInput::List(items) => items,
            RequirementsInput::Csv(s) => s.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub min_cgpa: Option<f64>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub requirements: RequirementsInput,
    #[serde(default)]
    pub custom_questions: Vec<CustomQuestion>,
}

/// A validated posting, ready to be tagged and inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub min_cgpa: Option<f64>,
    pub branch: Option<String>,
    pub requirements: Vec<String>,
    pub custom_questions: Vec<CustomQuestion>,
}

impl CreateJobRequest {
    pub fn validate(self) -> Result<NewJob, AppError> {
        let title = self.title.trim().to_string();
        check_length("title", &title, TITLE_LEN)?;
        let description = self.description.trim().to_string();
        check_length("description", &description, DESCRIPTION_LEN)?;

        // A minimum CGPA of 0 restricts nothing; store it as absent.
        validate_cgpa(self.min_cgpa)?;
        let min_cgpa = self.min_cgpa.filter(|&c| c > 0.0);

        let branch = normalize_branch(self.branch)?;
        let custom_questions = validate_questions(self.custom_questions)?;

        Ok(NewJob {
            title,
            description,
            min_cgpa,
            branch,
            requirements: self.requirements.normalize(),
            custom_questions,
        })
    }
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

fn validate_questions(questions: Vec<CustomQuestion>) -> Result<Vec<CustomQuestion>, AppError> {
    questions
        .into_iter()
        .map(|mut q| {
            q.question = q.question.trim().to_string();
            if q.question.is_empty() {
                return Err(AppError::Validation(
                    "custom questions must have text".to_string(),
                ));
            }
            if q.kind == QuestionKind::Select && q.options.is_empty() {
                return Err(AppError::Validation(format!(
                    "select question '{}' needs at least one option",
                    q.question
                )));
            }
            Ok(q)
        })
        .collect()
}

/// Human-readable branch restriction, for logs.
pub fn describe_branch(branch: Option<&str>) -> String {
    match branch.and_then(allowed_branches) {
        None => "any".to_string(),
        Some(set) => {
            let mut names: Vec<String> = set.into_iter().collect();
            names.sort();
            names.join(",")
        }
    }
}

pub async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
