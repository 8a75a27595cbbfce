use serde::Deserialize;

use crate::errors::AppError;
use crate::models::user::{ROLE_RECRUITER, ROLE_STUDENT};

const EMAIL_MAX_LEN: usize = 254;
const NAME_MAX_LEN: usize = 100;
const COMPANY_MAX_LEN: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub company: Option<String>,
}

/// A validated account, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: &'static str,
    pub company: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let email = normalize_email(&self.email)?;

        let name = self.name.trim().to_string();
        if name.is_empty() || name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "name must be between 1 and {NAME_MAX_LEN} characters"
            )));
        }

        let role = match self.role.trim().to_ascii_lowercase().as_str() {
            "student" => ROLE_STUDENT,
            "recruiter" => ROLE_RECRUITER,
            other => {
                return Err(AppError::Validation(format!(
                    "role must be student or recruiter (got '{other}')"
                )))
            }
        };

        // Only recruiters carry a company.
        let company = match role {
            ROLE_RECRUITER => normalize_company(self.company)?,
            _ => None,
        };

        Ok(NewUser {
            email,
            name,
            role,
            company,
        })
    }
}

/// Trimmed, lower-cased email with a non-empty local part and a dotted domain.
pub fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let valid = email.len() <= EMAIL_MAX_LEN
        && !email.contains(char::is_whitespace)
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
    if !valid {
        return Err(AppError::Validation(format!("'{}' is not a valid email", raw.trim())));
    }
    Ok(email)
}

/// Trims a company name; blank becomes `None`.
pub fn normalize_company(company: Option<String>) -> Result<Option<String>, AppError> {
    let Some(company) = company.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    if company.chars().count() > COMPANY_MAX_LEN {
        return Err(AppError::Validation(format!(
            "company must not exceed {COMPANY_MAX_LEN} characters"
        )));
    }
    Ok(Some(company))
}
