//! Job Role Auto-Tagger: assigns suitable role tags to a job from its
//! free-text requirement list at creation time.
//!
//! Each requirement is scored in two passes:
//! - exact: the requirement, and each of its tokens, is normalized through the
//!   skill taxonomy the resume analyzer uses; every canonical skill found adds 1
//!   to each role listing that skill ("ML" → machine-learning → data-scientist)
//! - substring: a requirement hits a role term when either string contains the
//!   other ("react.js developer" ⊇ "react", "js" ⊆ "nextjs"); each hit adds 1
//!
//! Role selection is an ordered chain of strategies; the first one that returns
//! `Some` wins:
//! 1. `qualified_roles`: score ≥ 1, best first
//! 2. `any_positive`: every role with score > 0, definition order
//! 3. `default_role`: the catalog's default role

use tracing::debug;

use crate::skills::catalog::{SkillCatalog, SkillTaxonomy};
use crate::skills::extractor::tokenize;

/// Minimum score for the primary tier.
const QUALIFY_THRESHOLD: u32 = 1;

/// Per-role hit count, in role definition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTally {
    pub role: String,
    pub score: u32,
}

/// One tier of the fallback chain.
pub type RoleStrategy = fn(&[RoleTally], &SkillCatalog) -> Option<Vec<String>>;

pub const STRATEGIES: &[(&str, RoleStrategy)] = &[
    ("qualified", qualified_roles),
    ("lenient", any_positive),
    ("default", default_role),
];

/// Suitable roles for a job's requirement list, best match first, never empty.
pub fn detect_job_roles<S: AsRef<str>>(catalog: &SkillCatalog, requirements: &[S]) -> Vec<String> {
    let tallies = tally_roles(catalog, requirements);

    for (tier, strategy) in STRATEGIES {
        if let Some(roles) = strategy(&tallies, catalog) {
            debug!(tier = *tier, ?roles, "job roles detected");
            return roles;
        }
    }

    // Only reachable with an empty strategy table.
    vec![catalog.default_role().to_string()]
}

/// Counts exact-skill and bidirectional containment hits per role. Blank
/// requirements are skipped (an empty string is contained in every term).
pub fn tally_roles<S: AsRef<str>>(catalog: &SkillCatalog, requirements: &[S]) -> Vec<RoleTally> {
    let normalized: Vec<String> = requirements
        .iter()
        .map(|r| r.as_ref().trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect();
    let exact: Vec<Vec<&str>> = normalized
        .iter()
        .map(|r| canonical_skills(catalog.taxonomy(), r))
        .collect();

    catalog
        .roles()
        .iter()
        .map(|role| {
            let mut score = 0u32;
            for skills in &exact {
                for skill in skills {
                    if role.skills.iter().any(|s| s == skill) {
                        debug!(skill = *skill, role = %role.name, "role skill hit");
                        score = score.saturating_add(1);
                    }
                }
            }
            for requirement in &normalized {
                for term in role.tagging_terms() {
                    if requirement.contains(term) || term.contains(requirement.as_str()) {
                        debug!(requirement = %requirement, term, role = %role.name, "role term hit");
                        score = score.saturating_add(1);
                    }
                }
            }
            RoleTally {
                role: role.name.clone(),
                score,
            }
        })
        .collect()
}

/// Distinct canonical skills named by a lower-cased requirement, either as a
/// whole ("react native") or token by token ("python developer").
fn canonical_skills<'a>(taxonomy: &'a SkillTaxonomy, requirement: &str) -> Vec<&'a str> {
    let mut skills: Vec<&'a str> = Vec::new();
    let whole = taxonomy.normalize(requirement);
    let tokens = tokenize(requirement).filter_map(|t| taxonomy.normalize(&t));
    for skill in whole.into_iter().chain(tokens) {
        if !skills.contains(&skill) {
            skills.push(skill);
        }
    }
    skills
}

pub fn qualified_roles(tallies: &[RoleTally], _catalog: &SkillCatalog) -> Option<Vec<String>> {
    let mut qualified: Vec<&RoleTally> = tallies
        .iter()
        .filter(|t| t.score >= QUALIFY_THRESHOLD)
        .collect();
    if qualified.is_empty() {
        return None;
    }
    qualified.sort_by(|a, b| b.score.cmp(&a.score));
    Some(dedup_roles(qualified.into_iter().map(|t| t.role.as_str())))
}

pub fn any_positive(tallies: &[RoleTally], _catalog: &SkillCatalog) -> Option<Vec<String>> {
    let roles = dedup_roles(
        tallies
            .iter()
            .filter(|t| t.score > 0)
            .map(|t| t.role.as_str()),
    );
    (!roles.is_empty()).then_some(roles)
}

pub fn default_role(_tallies: &[RoleTally], catalog: &SkillCatalog) -> Option<Vec<String>> {
    Some(vec![catalog.default_role().to_string()])
}

fn dedup_roles<'a>(roles: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for role in roles {
        if !out.iter().any(|r| r == role) {
            out.push(role.to_string());
        }
    }
    out
}
