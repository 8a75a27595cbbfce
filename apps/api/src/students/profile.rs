use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

const CGPA_RANGE: (f64, f64) = (0.0, 10.0);
const SCORE_RANGE: (f64, f64) = (0.0, 100.0);
const BRANCH_MAX_LEN: usize = 50;

/// Loads a user or returns `NotFound`.
pub async fn fetch_user(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub async fn fetch_student(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    let user = fetch_user(pool, user_id).await?;
    if !user.is_student() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

pub async fn fetch_recruiter(pool: &PgPool, user_id: Uuid) -> Result<UserRow, AppError> {
    let user = fetch_user(pool, user_id).await?;
    if !user.is_recruiter() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}

pub fn validate_in_range(field: &str, value: Option<f64>, range: (f64, f64)) -> Result<(), AppError> {
    match value {
        Some(v) if !v.is_finite() || v < range.0 || v > range.1 => Err(AppError::Validation(format!(
            "{field} must be between {} and {}",
            range.0, range.1
        ))),
        _ => Ok(()),
    }
}

pub fn validate_cgpa(value: Option<f64>) -> Result<(), AppError> {
    validate_in_range("cgpa", value, CGPA_RANGE)
}

pub fn validate_score(field: &str, value: Option<f64>) -> Result<(), AppError> {
    validate_in_range(field, value, SCORE_RANGE)
}

/// Trims a branch name; blank becomes `None`.
pub fn normalize_branch(branch: Option<String>) -> Result<Option<String>, AppError> {
    let Some(branch) = branch.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) else {
        return Ok(None);
    };
    if branch.chars().count() > BRANCH_MAX_LEN {
        return Err(AppError::Validation(format!(
            "branch must not exceed {BRANCH_MAX_LEN} characters"
        )));
    }
    Ok(Some(branch))
}
