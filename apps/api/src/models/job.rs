use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::eligibility::EligibilityCriteria;
use crate::matching::job_matcher::MatchableJob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Text,
    Textarea,
    Select,
}

/// Extra question a recruiter attaches to a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomQuestion {
    pub question: String,
    #[serde(default, rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub min_cgpa: Option<f64>,
    pub branch: Option<String>,
    pub requirements: Vec<String>,
    pub suitable_roles: Vec<String>,
    pub custom_questions: Json<Vec<CustomQuestion>>,
    pub posted_at: DateTime<Utc>,
}

impl EligibilityCriteria for JobRow {
    fn min_cgpa(&self) -> Option<f64> {
        self.min_cgpa
    }

    fn branch_spec(&self) -> Option<&str> {
        self.branch.as_deref()
    }
}

impl MatchableJob for JobRow {
    fn suitable_roles(&self) -> &[String] {
        &self.suitable_roles
    }
}
