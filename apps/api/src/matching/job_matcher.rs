//! Job Matcher: filters a job pool to what a student is eligible for, then
//! narrows it to jobs whose suitable roles overlap the resume's best roles.
//!
//! Skill matching only ever narrows a non-empty result. If it finds nothing, or
//! the stored analysis cannot be read, the plain eligible list is returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::matching::eligibility::{is_eligible, EligibilityCriteria, StudentProfile};

#[derive(Debug, Error)]
pub enum AnalysisDocError {
    #[error("analysis document is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A job the matcher can rank: eligibility constraints plus role tags.
pub trait MatchableJob: EligibilityCriteria {
    fn suitable_roles(&self) -> &[String];
}

/// Listing response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing<J> {
    pub jobs: Vec<J>,
    /// Number of jobs that passed eligibility.
    pub total_jobs: usize,
    /// Number of jobs that also matched the resume's best roles (0 on fallback).
    pub matched_count: usize,
}

/// The only part of a stored analysis the matcher needs.
#[derive(Debug, Deserialize)]
struct RoleSummary {
    #[serde(rename = "bestRoles")]
    best_roles: Vec<String>,
}

/// Reads `bestRoles` out of a persisted analysis document.
pub fn best_roles_from_document(document: &Value) -> Result<Vec<String>, AnalysisDocError> {
    let summary = RoleSummary::deserialize(document)?;
    Ok(summary.best_roles)
}

/// Eligible jobs for `student`, narrowed and ranked by the resume's best roles
/// (`ResumeAnalysis::best_roles`). `None` or an empty list skips skill ranking.
pub fn match_jobs<J: MatchableJob>(
    student: &StudentProfile,
    best_roles: Option<&[String]>,
    jobs: Vec<J>,
) -> JobListing<J> {
    let eligible: Vec<J> = jobs
        .into_iter()
        .filter(|job| is_eligible(student, job))
        .collect();
    let total_jobs = eligible.len();

    let best_roles = match best_roles {
        Some(roles) if !roles.is_empty() => roles,
        _ => {
            return JobListing {
                jobs: eligible,
                total_jobs,
                matched_count: 0,
            }
        }
    };

    let overlaps: Vec<usize> = eligible
        .iter()
        .map(|job| role_overlap(job.suitable_roles(), best_roles))
        .collect();

    if overlaps.iter().all(|&o| o == 0) {
        return JobListing {
            jobs: eligible,
            total_jobs,
            matched_count: 0,
        };
    }

    let mut matched: Vec<(usize, J)> = overlaps
        .into_iter()
        .zip(eligible)
        .filter(|(overlap, _)| *overlap > 0)
        .collect();
    // Stable: equal overlap keeps pool order.
    matched.sort_by(|a, b| b.0.cmp(&a.0));

    let jobs: Vec<J> = matched.into_iter().map(|(_, job)| job).collect();
    JobListing {
        matched_count: jobs.len(),
        jobs,
        total_jobs,
    }
}

/// Same as [`match_jobs`], reading best roles from the raw stored document.
/// An unreadable document disables skill ranking instead of failing.
pub fn match_jobs_with_document<J: MatchableJob>(
    student: &StudentProfile,
    document: Option<&Value>,
    jobs: Vec<J>,
) -> JobListing<J> {
    let best_roles = match document {
        None | Some(Value::Null) => None,
        Some(doc) => match best_roles_from_document(doc) {
            Ok(roles) => Some(roles),
            Err(e) => {
                warn!("Skipping skill ranking: {e}");
                None
            }
        },
    };
    match_jobs(student, best_roles.as_deref(), jobs)
}

/// Count of distinct best roles present in the job's tags (case-insensitive).
fn role_overlap(suitable: &[String], best: &[String]) -> usize {
    best.iter()
        .enumerate()
        .filter(|(i, role)| !best[..*i].iter().any(|b| b.eq_ignore_ascii_case(role)))
        .filter(|(_, role)| suitable.iter().any(|s| s.eq_ignore_ascii_case(role)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::eligibility::JobEligibilityCriteria;
    use crate::skills::catalog::SkillCatalog;
    use crate::skills::extractor::{analyze, ResumeAnalysis};
    use crate::skills::role_tagger::detect_job_roles;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct TestJob {
        id: u32,
        criteria: JobEligibilityCriteria,
        roles: Vec<String>,
    }

    impl EligibilityCriteria for TestJob {
        fn min_cgpa(&self) -> Option<f64> {
            self.criteria.min_cgpa
        }
        fn branch_spec(&self) -> Option<&str> {
            self.criteria.branch_spec.as_deref()
        }
    }

    impl MatchableJob for TestJob {
        fn suitable_roles(&self) -> &[String] {
            &self.roles
        }
    }

    fn job(id: u32, min_cgpa: Option<f64>, roles: &[&str]) -> TestJob {
        TestJob {
            id,
            criteria: JobEligibilityCriteria {
                min_cgpa,
                branch_spec: None,
            },
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn ids(listing: &JobListing<TestJob>) -> Vec<u32> {
        listing.jobs.iter().map(|j| j.id).collect()
    }

    fn student(cgpa: f64) -> StudentProfile {
        StudentProfile {
            cgpa: Some(cgpa),
            branch: Some("CSE".to_string()),
        }
    }

    fn analysis_with(best_roles: &[&str]) -> ResumeAnalysis {
        let mut analysis = analyze(&SkillCatalog::default(), "");
        analysis.best_roles = best_roles.iter().map(|r| r.to_string()).collect();
        analysis
    }

    #[test]
    fn test_without_analysis_returns_all_eligible() {
        let jobs = vec![job(1, Some(9.5), &[]), job(2, None, &["frontend"]), job(3, Some(6.0), &[])];
        let listing = match_jobs(&student(8.0), None, jobs);
        assert_eq!(ids(&listing), vec![2, 3]);
        assert_eq!(listing.total_jobs, 2);
        assert_eq!(listing.matched_count, 0);
    }

    #[test]
    fn test_no_role_overlap_falls_back_to_eligible_list() {
        let jobs = vec![
            job(1, None, &["frontend"]),
            job(2, None, &["mobile"]),
            job(3, None, &["devops"]),
        ];
        let analysis = analysis_with(&["backend"]);
        let listing = match_jobs(&student(8.0), Some(analysis.best_roles.as_slice()), jobs);
        assert_eq!(ids(&listing), vec![1, 2, 3]);
        assert_eq!(listing.matched_count, 0);
    }

    #[test]
    fn test_matched_subset_replaces_eligible_list() {
        let jobs = vec![
            job(1, None, &["frontend"]),
            job(2, None, &["backend"]),
            job(3, Some(9.9), &["backend"]),
        ];
        let analysis = analysis_with(&["backend"]);
        let listing = match_jobs(&student(8.0), Some(analysis.best_roles.as_slice()), jobs);
        assert_eq!(ids(&listing), vec![2]);
        assert_eq!(listing.total_jobs, 2);
        assert_eq!(listing.matched_count, 1);
    }

    #[test]
    fn test_matched_jobs_ranked_by_overlap() {
        let jobs = vec![
            job(1, None, &["backend"]),
            job(2, None, &["backend", "full-stack"]),
            job(3, None, &["full-stack"]),
        ];
        let analysis = analysis_with(&["full-stack", "backend", "devops"]);
        let listing = match_jobs(&student(8.0), Some(analysis.best_roles.as_slice()), jobs);
        assert_eq!(ids(&listing), vec![2, 1, 3]);
        assert_eq!(listing.matched_count, 3);
    }

    #[test]
    fn test_empty_best_roles_skips_matching() {
        let jobs = vec![job(1, None, &["frontend"])];
        let analysis = analysis_with(&[]);
        let listing = match_jobs(&student(8.0), Some(analysis.best_roles.as_slice()), jobs);
        assert_eq!(ids(&listing), vec![1]);
        assert_eq!(listing.matched_count, 0);
    }

    #[test]
    fn test_nothing_eligible_returns_empty() {
        let jobs = vec![job(1, Some(9.0), &["backend"])];
        let analysis = analysis_with(&["backend"]);
        let listing = match_jobs(&student(6.0), Some(analysis.best_roles.as_slice()), jobs);
        assert!(listing.jobs.is_empty());
        assert_eq!(listing.total_jobs, 0);
    }

    #[test]
    fn test_malformed_document_falls_back_to_eligible_list() {
        let jobs = vec![job(1, None, &["frontend"]), job(2, None, &["backend"])];
        let doc = json!({"bestRoles": "backend"});
        let listing = match_jobs_with_document(&student(8.0), Some(&doc), jobs);
        assert_eq!(ids(&listing), vec![1, 2]);
        assert_eq!(listing.matched_count, 0);
    }

    #[test]
    fn test_document_without_best_roles_falls_back() {
        let jobs = vec![job(1, None, &["backend"])];
        let doc = json!({"skillScores": {}});
        let listing = match_jobs_with_document(&student(8.0), Some(&doc), jobs);
        assert_eq!(ids(&listing), vec![1]);
    }

    #[test]
    fn test_valid_document_is_used_for_matching() {
        let jobs = vec![job(1, None, &["frontend"]), job(2, None, &["backend"])];
        let doc = json!({"bestRoles": ["backend"], "roleScores": {"backend": 4}});
        let listing = match_jobs_with_document(&student(8.0), Some(&doc), jobs);
        assert_eq!(ids(&listing), vec![2]);
    }

    #[test]
    fn test_null_document_means_no_analysis() {
        let jobs = vec![job(1, None, &["frontend"])];
        let listing = match_jobs_with_document(&student(8.0), Some(&Value::Null), jobs);
        assert_eq!(ids(&listing), vec![1]);
    }

    #[test]
    fn test_tagged_job_matches_resume_with_same_keywords() {
        let catalog = SkillCatalog::default();
        let requirements = ["React", "Node.js", "MongoDB"];
        let roles = detect_job_roles(&catalog, &requirements);
        let tagged = TestJob {
            id: 7,
            criteria: JobEligibilityCriteria::default(),
            roles,
        };
        let unrelated = job(8, None, &["data-scientist"]);

        let analysis = analyze(&catalog, &requirements.join(" "));
        let listing = match_jobs(
            &student(8.0),
            Some(analysis.best_roles.as_slice()),
            vec![unrelated, tagged],
        );
        assert_eq!(ids(&listing), vec![7]);
    }

    fn tagged_job_matches(catalog: &SkillCatalog, requirement: &str, resume_text: &str) -> bool {
        let tagged = TestJob {
            id: 1,
            criteria: JobEligibilityCriteria::default(),
            roles: detect_job_roles(catalog, &[requirement]),
        };
        let analysis = analyze(catalog, resume_text);
        let listing = match_jobs(
            &student(8.0),
            Some(analysis.best_roles.as_slice()),
            vec![tagged],
        );
        listing.matched_count == 1
    }

    #[test]
    fn test_short_synonym_job_matches_resume_naming_it() {
        let catalog = SkillCatalog::default();
        assert!(tagged_job_matches(&catalog, "ML", "ML"));
        assert!(tagged_job_matches(&catalog, "AI", "AI"));
    }

    #[test]
    fn test_every_synonym_round_trips_through_tagger_and_analyzer() {
        let catalog = SkillCatalog::default();
        for skill in catalog.taxonomy().skills() {
            for synonym in &skill.synonyms {
                let resume = format!("Built a project with {synonym}");
                assert!(
                    tagged_job_matches(&catalog, synonym, &resume),
                    "job requiring '{synonym}' ({}) missed the resume naming it",
                    skill.name
                );
            }
        }
    }

    #[test]
    fn test_role_overlap_counts_distinct_roles() {
        let suitable = vec!["Backend".to_string()];
        let best = vec!["backend".to_string(), "backend".to_string()];
        assert_eq!(role_overlap(&suitable, &best), 1);
    }
}
