use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::application::CustomAnswer;
use crate::models::job::{CustomQuestion, QuestionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(AppError::Validation(format!(
                "status must be one of pending, accepted, rejected (got '{other}')"
            ))),
        }
    }
}

/// Matches answers to the job's questions.
///
/// Answers are keyed by question text. Answers to unknown questions are
/// dropped, and blank answers count as missing. Every required question must
/// be answered; select answers must be one of the listed options.
pub fn validate_answers(
    questions: &[CustomQuestion],
    answers: Vec<CustomAnswer>,
) -> Result<Vec<CustomAnswer>, AppError> {
    let mut accepted = Vec::new();
    let mut missing = Vec::new();

    for question in questions {
        let answer = answers
            .iter()
            .find(|a| a.question.trim() == question.question.trim())
            .map(|a| a.answer.trim())
            .filter(|a| !a.is_empty());

        match answer {
            Some(answer) => {
                if question.kind == QuestionKind::Select
                    && !question.options.iter().any(|o| o.trim() == answer)
                {
                    return Err(AppError::Validation(format!(
                        "'{answer}' is not an option for '{}'",
                        question.question
                    )));
                }
                accepted.push(CustomAnswer {
                    question: question.question.clone(),
                    answer: answer.to_string(),
                });
            }
            None if question.required => missing.push(question.question.clone()),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "required questions unanswered: {}",
            missing.join("; ")
        )));
    }
    Ok(accepted)
}
