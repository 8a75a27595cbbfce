use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::eligibility::StudentProfile;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_RECRUITER: &str = "recruiter";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub name: String,
    pub cgpa: Option<f64>,
    pub branch: Option<String>,
    pub company: Option<String>,
    pub tenth_score: Option<f64>,
    pub twelfth_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn is_student(&self) -> bool {
        self.role == ROLE_STUDENT
    }

    pub fn is_recruiter(&self) -> bool {
        self.role == ROLE_RECRUITER
    }

    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            cgpa: self.cgpa,
            branch: self.branch.clone(),
        }
    }
}
