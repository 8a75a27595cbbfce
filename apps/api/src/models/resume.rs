use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub storage_key: Option<String>,
    /// Stored `ResumeAnalysis` document. Read back as raw JSON so a corrupt
    /// document never fails the row.
    pub skill_analysis: Option<Value>,
    pub uploaded_at: DateTime<Utc>,
}
