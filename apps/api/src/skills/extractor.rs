//! Resume Analyzer: turns plain resume text into per-skill scores and a ranked
//! list of best-fit roles.
//!
//! Pure and total: any string (empty, garbled, non-English) yields an analysis.
//! No I/O, no shared mutable state; the catalog is read-only.
//!
//! Scoring:
//! - `frequency`: exact token matches against the synonym table
//! - `project_count`: +1 per (project-context line, skill) with a substring hit
//! - `internship_months`: months parsed from an experience-context line, added to
//!   every skill with a substring hit on that line
//! - `total_score = frequency + project_count + internship_months * 2`

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::skills::catalog::{RoleDefinition, SkillCatalog, SkillTaxonomy};

const PROJECT_MARKERS: &[&str] = &["project", "built", "developed"];
const EXPERIENCE_MARKERS: &[&str] = &["intern", "work experience", "employment"];

/// Maximum number of roles reported in `best_roles`.
const BEST_ROLE_LIMIT: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillScore {
    pub frequency: u32,
    pub project_count: u32,
    pub internship_months: u32,
    pub total_score: u32,
}

impl SkillScore {
    #[cfg(test)]
    pub fn new(frequency: u32, project_count: u32, internship_months: u32) -> Self {
        let mut score = Self {
            frequency,
            project_count,
            internship_months,
            total_score: 0,
        };
        score.recompute_total();
        score
    }

    fn recompute_total(&mut self) {
        self.total_score = self
            .frequency
            .saturating_add(self.project_count)
            .saturating_add(self.internship_months.saturating_mul(2));
    }
}

/// Persisted verbatim as the resume's `skill_analysis` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub skill_scores: BTreeMap<String, SkillScore>,
    pub role_scores: BTreeMap<String, u32>,
    pub best_roles: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl ResumeAnalysis {
    /// True when no skill in the taxonomy was recognised at all.
    pub fn is_empty(&self) -> bool {
        self.skill_scores.values().all(|s| s.total_score == 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze(catalog: &SkillCatalog, text: &str) -> ResumeAnalysis {
    analyze_at(catalog, text, Utc::now())
}

/// Same as [`analyze`] with a caller-supplied timestamp.
pub fn analyze_at(catalog: &SkillCatalog, text: &str, analyzed_at: DateTime<Utc>) -> ResumeAnalysis {
    let skill_scores = score_skills(catalog.taxonomy(), text);
    let role_scores = score_roles(catalog.roles(), &skill_scores);
    let best_roles = rank_best_roles(catalog.roles(), &role_scores);

    ResumeAnalysis {
        skill_scores,
        role_scores,
        best_roles,
        analyzed_at,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skill scoring
// ────────────────────────────────────────────────────────────────────────────

fn score_skills(taxonomy: &SkillTaxonomy, text: &str) -> BTreeMap<String, SkillScore> {
    let mut scores: BTreeMap<String, SkillScore> = taxonomy
        .skills()
        .iter()
        .map(|s| (s.name.clone(), SkillScore::default()))
        .collect();

    for token in tokenize(text) {
        if let Some(skill) = taxonomy.normalize(&token) {
            if let Some(score) = scores.get_mut(skill) {
                score.frequency = score.frequency.saturating_add(1);
            }
        }
    }

    for line in text.lines() {
        let lower = line.to_lowercase();

        if contains_any(&lower, PROJECT_MARKERS) {
            for skill in skills_mentioned_in(taxonomy, &lower) {
                if let Some(score) = scores.get_mut(skill) {
                    score.project_count = score.project_count.saturating_add(1);
                }
            }
        }

        if contains_any(&lower, EXPERIENCE_MARKERS) {
            let months = extract_duration_months(line);
            if months > 0 {
                for skill in skills_mentioned_in(taxonomy, &lower) {
                    if let Some(score) = scores.get_mut(skill) {
                        score.internship_months = score.internship_months.saturating_add(months);
                    }
                }
            }
        }
    }

    for score in scores.values_mut() {
        score.recompute_total();
    }
    scores
}

/// Lower-cased tokens split on runs of non-word characters (word = ASCII
/// letter, digit or underscore).
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn contains_any(line: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| line.contains(m))
}

/// Canonical skills with at least one synonym appearing as a substring of the
/// lower-cased line. Each skill is yielded once per line.
fn skills_mentioned_in<'a>(
    taxonomy: &'a SkillTaxonomy,
    lower_line: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    taxonomy
        .skills()
        .iter()
        .filter(move |skill| {
            skill
                .synonyms
                .iter()
                .any(|syn| !syn.is_empty() && lower_line.contains(syn.as_str()))
        })
        .map(|skill| skill.name.as_str())
}

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)([0-9]+)\s*(months?|mos?|years?|yrs?)\b")
            .expect("duration pattern is a valid regex")
    })
}

/// Sums every `<n> month(s) | mo(s) | year(s) | yr(s)` mention in a line, in
/// months. Numbers too large to represent are skipped.
pub fn extract_duration_months(line: &str) -> u32 {
    duration_pattern()
        .captures_iter(line)
        .filter_map(|caps| {
            let amount: u32 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2)?.as_str();
            if unit.starts_with(['y', 'Y']) {
                amount.checked_mul(12)
            } else {
                Some(amount)
            }
        })
        .fold(0u32, u32::saturating_add)
}

// ────────────────────────────────────────────────────────────────────────────
// Role categorization
// ────────────────────────────────────────────────────────────────────────────

fn score_roles(
    roles: &[RoleDefinition],
    skill_scores: &BTreeMap<String, SkillScore>,
) -> BTreeMap<String, u32> {
    roles
        .iter()
        .map(|role| {
            let total = role
                .skills
                .iter()
                .filter_map(|s| skill_scores.get(s))
                .fold(0u32, |acc, s| acc.saturating_add(s.total_score));
            (role.name.clone(), total)
        })
        .collect()
}

/// Top roles by score, descending. Ties keep role definition order; zero-score
/// roles are never reported.
fn rank_best_roles(roles: &[RoleDefinition], role_scores: &BTreeMap<String, u32>) -> Vec<String> {
    let mut ranked: Vec<(&str, u32)> = roles
        .iter()
        .map(|r| (r.name.as_str(), role_scores.get(&r.name).copied().unwrap_or(0)))
        .filter(|(_, score)| *score > 0)
        .collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(BEST_ROLE_LIMIT)
        .map(|(name, _)| name.to_string())
        .collect()
}
