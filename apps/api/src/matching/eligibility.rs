//! Eligibility: the single CGPA/branch predicate shared by the apply-time gate
//! and the job listing filter.
//!
//! Policy for missing data:
//! - job has a minimum CGPA, student has none → ineligible (cannot verify)
//! - job restricts branches, student has no branch → eligible

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Branch spec meaning "no restriction".
const ANY_BRANCH: &str = "any";

/// The parts of a student profile that eligibility looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub cgpa: Option<f64>,
    #[serde(default)]
    pub branch: Option<String>,
}

/// Anything that carries a job's eligibility constraints.
pub trait EligibilityCriteria {
    fn min_cgpa(&self) -> Option<f64>;
    fn branch_spec(&self) -> Option<&str>;
}

/// Standalone criteria, as accepted by the eligibility endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEligibilityCriteria {
    #[serde(default, alias = "min_cgpa")]
    pub min_cgpa: Option<f64>,
    #[serde(default, alias = "branch", alias = "branch_spec")]
    pub branch_spec: Option<String>,
}

impl EligibilityCriteria for JobEligibilityCriteria {
    fn min_cgpa(&self) -> Option<f64> {
        self.min_cgpa
    }

    fn branch_spec(&self) -> Option<&str> {
        self.branch_spec.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IneligibilityReason {
    CgpaBelowMinimum { cgpa: f64, min_cgpa: f64 },
    CgpaUnknown { min_cgpa: f64 },
    BranchNotAllowed { branch: String, allowed: String },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CgpaBelowMinimum { cgpa, min_cgpa } => {
                write!(f, "Your CGPA ({cgpa}) is below the required minimum ({min_cgpa})")
            }
            Self::CgpaUnknown { min_cgpa } => write!(
                f,
                "CGPA is missing from your profile; this job requires a minimum CGPA of {min_cgpa}"
            ),
            Self::BranchNotAllowed { branch, allowed } => write!(
                f,
                "Your branch ({branch}) is not eligible for this position (allowed: {allowed})"
            ),
        }
    }
}

/// Apply-gate response: every failing check, not only the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

pub fn check_eligibility(
    student: &StudentProfile,
    job: &impl EligibilityCriteria,
) -> EligibilityReport {
    let failures = failing_checks(student, job);
    EligibilityReport {
        eligible: failures.is_empty(),
        reasons: failures.iter().map(ToString::to_string).collect(),
    }
}

pub fn is_eligible(student: &StudentProfile, job: &impl EligibilityCriteria) -> bool {
    failing_checks(student, job).is_empty()
}

pub fn failing_checks(
    student: &StudentProfile,
    job: &impl EligibilityCriteria,
) -> Vec<IneligibilityReason> {
    let mut failures = Vec::new();

    if let Some(min_cgpa) = job.min_cgpa() {
        match student.cgpa {
            Some(cgpa) if cgpa < min_cgpa => {
                failures.push(IneligibilityReason::CgpaBelowMinimum { cgpa, min_cgpa })
            }
            Some(_) => {}
            None => failures.push(IneligibilityReason::CgpaUnknown { min_cgpa }),
        }
    }

    if let Some(allowed) = job.branch_spec().and_then(allowed_branches) {
        let branch = student
            .branch
            .as_deref()
            .map(|b| b.trim().to_lowercase())
            .unwrap_or_default();

        // No branch on the profile: nothing to reject on.
        if !branch.is_empty() && !allowed.contains(&branch) {
            failures.push(IneligibilityReason::BranchNotAllowed {
                branch: student.branch.clone().unwrap_or_default().trim().to_string(),
                allowed: job.branch_spec().unwrap_or_default().trim().to_string(),
            });
        }
    }

    failures
}

/// Allowed branch set for a spec, or `None` when the spec does not restrict
/// (empty, "any", or no non-blank entries).
pub fn allowed_branches(spec: &str) -> Option<HashSet<String>> {
    let spec = spec.trim();
    if spec.is_empty() || spec.eq_ignore_ascii_case(ANY_BRANCH) {
        return None;
    }

    let allowed: HashSet<String> = spec
        .split(',')
        .map(|b| b.trim().to_lowercase())
        .filter(|b| !b.is_empty())
        .collect();

    (!allowed.is_empty()).then_some(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(cgpa: Option<f64>, branch: Option<&str>) -> StudentProfile {
        StudentProfile {
            cgpa,
            branch: branch.map(str::to_string),
        }
    }

    fn job(min_cgpa: Option<f64>, branch: Option<&str>) -> JobEligibilityCriteria {
        JobEligibilityCriteria {
            min_cgpa,
            branch_spec: branch.map(str::to_string),
        }
    }

    #[test]
    fn test_case_insensitive_branch_match_is_eligible() {
        let report = check_eligibility(&student(Some(8.0), Some("cse")), &job(Some(7.5), Some("CSE,ECE")));
        assert!(report.eligible);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_low_cgpa_is_ineligible_with_cgpa_reason() {
        let report = check_eligibility(&student(Some(7.0), Some("CSE")), &job(Some(7.5), Some("CSE,ECE")));
        assert!(!report.eligible);
        assert_eq!(report.reasons.len(), 1);
        assert!(report.reasons[0].contains("CGPA"));
    }

    #[test]
    fn test_cgpa_equal_to_minimum_passes() {
        assert!(is_eligible(&student(Some(7.5), None), &job(Some(7.5), None)));
    }

    #[test]
    fn test_any_branch_always_passes() {
        for branch in ["CSE", "Mechanical", "civil", ""] {
            assert!(is_eligible(&student(None, Some(branch)), &job(None, Some("Any"))));
        }
        assert!(is_eligible(&student(None, Some("EEE")), &job(None, Some("  ANY  "))));
    }

    #[test]
    fn test_absent_or_empty_branch_spec_is_unrestricted() {
        assert!(is_eligible(&student(None, Some("EEE")), &job(None, None)));
        assert!(is_eligible(&student(None, Some("EEE")), &job(None, Some(""))));
        assert!(is_eligible(&student(None, Some("EEE")), &job(None, Some(" , ,"))));
    }

    #[test]
    fn test_branch_list_entries_are_trimmed() {
        assert!(is_eligible(&student(None, Some(" ece ")), &job(None, Some("CSE ,  ECE "))));
    }

    #[test]
    fn test_branch_outside_list_is_rejected() {
        let report = check_eligibility(&student(Some(9.0), Some("Mechanical")), &job(None, Some("CSE,ECE")));
        assert!(!report.eligible);
        assert!(report.reasons[0].contains("Mechanical"));
    }

    #[test]
    fn test_branch_is_matched_exactly_not_by_substring() {
        // "it" appears inside "civil it" but is not a listed branch
        assert!(!is_eligible(&student(None, Some("it")), &job(None, Some("Civil IT"))));
    }

    #[test]
    fn test_missing_cgpa_fails_closed() {
        let failures = failing_checks(&student(None, Some("CSE")), &job(Some(6.0), None));
        assert_eq!(failures, vec![IneligibilityReason::CgpaUnknown { min_cgpa: 6.0 }]);
    }

    // Documented quirk: a missing branch passes while a missing CGPA fails.
    #[test]
    fn test_missing_branch_fails_open() {
        assert!(is_eligible(&student(Some(8.0), None), &job(None, Some("CSE"))));
        assert!(is_eligible(&student(Some(8.0), Some("   ")), &job(None, Some("CSE"))));
    }

    #[test]
    fn test_no_minimum_ignores_missing_cgpa() {
        assert!(is_eligible(&student(None, None), &job(None, None)));
    }

    #[test]
    fn test_every_failing_check_is_reported() {
        let report = check_eligibility(&student(Some(5.0), Some("MECH")), &job(Some(7.0), Some("CSE")));
        assert!(!report.eligible);
        assert_eq!(report.reasons.len(), 2);
        assert!(report.reasons[0].contains("CGPA"));
        assert!(report.reasons[1].contains("branch"));
    }

    #[test]
    fn test_criteria_accept_snake_and_camel_case() {
        let camel: JobEligibilityCriteria =
            serde_json::from_str(r#"{"minCgpa": 7.0, "branchSpec": "CSE"}"#).unwrap();
        let snake: JobEligibilityCriteria =
            serde_json::from_str(r#"{"min_cgpa": 7.0, "branch": "CSE"}"#).unwrap();
        assert_eq!(camel, snake);
    }
}
