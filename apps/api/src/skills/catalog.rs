//! Skill catalog: the skill taxonomy and role definitions shared by the resume
//! analyzer and the job role auto-tagger.
//!
//! Built once at startup (built-in defaults or a JSON file), validated, then held
//! behind an `Arc` in `AppState`. Nothing mutates it after construction.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role returned when nothing in a requirement list points anywhere.
pub const DEFAULT_ROLE: &str = "full-stack";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read skill catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse skill catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skill '{0}' has no synonyms")]
    EmptySynonyms(String),

    #[error("synonym '{synonym}' is claimed by both '{first}' and '{second}'")]
    OverlappingSynonym {
        synonym: String,
        first: String,
        second: String,
    },

    #[error("role '{0}' has no skills")]
    EmptyRole(String),

    #[error("role '{role}' references unknown skill '{skill}'")]
    UnknownSkill { role: String, skill: String },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },
}

/// A canonical skill and the surface forms that map to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub synonyms: Vec<String>,
}

/// A role and the canonical skills that make it up.
///
/// `tagging_keywords` are extra surface terms only the job role auto-tagger
/// looks at (framework names, tools). They never contribute to resume scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub name: String,
    pub skills: Vec<String>,
    #[serde(default)]
    pub tagging_keywords: Vec<String>,
}

impl RoleDefinition {
    /// Every term the auto-tagger matches requirements against, skills first.
    pub fn tagging_terms(&self) -> impl Iterator<Item = &str> {
        self.skills
            .iter()
            .chain(self.tagging_keywords.iter())
            .map(String::as_str)
    }
}

/// Ordered canonical skill → synonym table.
///
/// Order is significant: when synonym sets overlap, the first skill wins.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    skills: Vec<SkillDefinition>,
    by_synonym: HashMap<String, usize>,
}

impl SkillTaxonomy {
    pub fn new(skills: Vec<SkillDefinition>) -> Self {
        let skills: Vec<SkillDefinition> = skills
            .into_iter()
            .map(|s| SkillDefinition {
                name: s.name.to_lowercase(),
                synonyms: s.synonyms.iter().map(|v| v.to_lowercase()).collect(),
            })
            .collect();

        let mut by_synonym = HashMap::new();
        for (idx, skill) in skills.iter().enumerate() {
            for synonym in &skill.synonyms {
                by_synonym.entry(synonym.clone()).or_insert(idx);
            }
        }

        Self { skills, by_synonym }
    }

    pub fn skills(&self) -> &[SkillDefinition] {
        &self.skills
    }

    /// Canonical skill for an exact (already lower-cased) token.
    pub fn normalize(&self, token: &str) -> Option<&str> {
        self.by_synonym
            .get(token)
            .map(|&idx| self.skills[idx].name.as_str())
    }

    pub fn contains_skill(&self, name: &str) -> bool {
        self.skills.iter().any(|s| s.name == name)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        let mut owner: HashMap<&str, &str> = HashMap::new();

        for skill in &self.skills {
            if !names.insert(skill.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    kind: "skill",
                    name: skill.name.clone(),
                });
            }
            if skill.synonyms.iter().all(|s| s.trim().is_empty()) {
                return Err(CatalogError::EmptySynonyms(skill.name.clone()));
            }
            for synonym in &skill.synonyms {
                match owner.get(synonym.as_str()) {
                    Some(first) if *first != skill.name => {
                        return Err(CatalogError::OverlappingSynonym {
                            synonym: synonym.clone(),
                            first: first.to_string(),
                            second: skill.name.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(synonym.as_str(), skill.name.as_str());
                    }
                }
            }
        }
        Ok(())
    }
}

/// On-disk shape of a catalog override file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    skills: Vec<SkillDefinition>,
    roles: Vec<RoleDefinition>,
    #[serde(default)]
    default_role: Option<String>,
}

/// Taxonomy plus role table, validated together.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    taxonomy: SkillTaxonomy,
    roles: Vec<RoleDefinition>,
    default_role: String,
}

impl SkillCatalog {
    /// Builds a catalog without validation. Tests use this to exercise
    /// misconfigured tables; startup goes through [`SkillCatalog::validated`].
    pub fn new(
        skills: Vec<SkillDefinition>,
        roles: Vec<RoleDefinition>,
        default_role: impl Into<String>,
    ) -> Self {
        let roles = roles
            .into_iter()
            .map(|r| RoleDefinition {
                name: r.name.to_lowercase(),
                skills: r.skills.iter().map(|s| s.to_lowercase()).collect(),
                tagging_keywords: r
                    .tagging_keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .collect(),
            })
            .collect();

        Self {
            taxonomy: SkillTaxonomy::new(skills),
            roles,
            default_role: default_role.into(),
        }
    }

    pub fn validated(
        skills: Vec<SkillDefinition>,
        roles: Vec<RoleDefinition>,
        default_role: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self::new(skills, roles, default_role);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog from a JSON file with `skills`, `roles` and an optional
    /// `default_role`.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::validated(
            file.skills,
            file.roles,
            file.default_role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        )
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn roles(&self) -> &[RoleDefinition] {
        &self.roles
    }

    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.taxonomy.validate()?;

        let mut names = HashSet::new();
        for role in &self.roles {
            if !names.insert(role.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    kind: "role",
                    name: role.name.clone(),
                });
            }
            if role.skills.is_empty() {
                return Err(CatalogError::EmptyRole(role.name.clone()));
            }
            if let Some(skill) = role
                .skills
                .iter()
                .find(|s| !self.taxonomy.contains_skill(s))
            {
                return Err(CatalogError::UnknownSkill {
                    role: role.name.clone(),
                    skill: skill.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::new(default_skills(), default_roles(), DEFAULT_ROLE)
    }
}

fn skill(name: &str, synonyms: &[&str]) -> SkillDefinition {
    SkillDefinition {
        name: name.to_string(),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
    }
}

fn role(name: &str, skills: &[&str], tagging_keywords: &[&str]) -> RoleDefinition {
    RoleDefinition {
        name: name.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        tagging_keywords: tagging_keywords.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_skills() -> Vec<SkillDefinition> {
    vec![
        // Frontend
        skill("react", &["react", "reactjs", "react.js"]),
        skill("javascript", &["javascript", "js", "es6", "ecmascript"]),
        skill("html", &["html", "html5"]),
        skill("css", &["css", "css3", "sass", "scss"]),
        // Backend
        skill("nodejs", &["node", "nodejs", "node.js", "express"]),
        skill("python", &["python", "py", "django", "flask"]),
        skill("java", &["java", "spring", "j2ee"]),
        skill("php", &["php", "laravel", "symfony"]),
        // Databases
        skill("mongodb", &["mongodb", "mongo"]),
        skill("sql", &["sql", "mysql", "postgresql", "oracle"]),
        // Mobile
        skill("react-native", &["react-native", "react native"]),
        skill("flutter", &["flutter", "dart"]),
        // DevOps
        skill("docker", &["docker", "container"]),
        skill("aws", &["aws", "amazon web services", "ec2", "s3"]),
        // Data science
        skill(
            "machine-learning",
            &["machine learning", "ml", "ai", "artificial intelligence"],
        ),
    ]
}

pub fn default_roles() -> Vec<RoleDefinition> {
    vec![
        role(
            "full-stack",
            &["react", "javascript", "nodejs", "html", "css", "mongodb", "sql"],
            &["express", "nextjs", "typescript"],
        ),
        role(
            "frontend",
            &["react", "javascript", "html", "css"],
            &["vue", "angular", "sass", "bootstrap", "tailwind"],
        ),
        role(
            "backend",
            &["nodejs", "python", "java", "sql", "mongodb", "php"],
            &["express", "django", "spring", "flask", "backend"],
        ),
        role(
            "data-scientist",
            &["python", "machine-learning", "sql"],
            &[
                "machine learning",
                "artificial intelligence",
                "tensorflow",
                "pytorch",
                "data science",
                "statistics",
            ],
        ),
        role(
            "devops",
            &["docker", "aws", "nodejs"],
            &["kubernetes", "jenkins", "ci/cd", "azure", "linux", "nginx"],
        ),
        role(
            "mobile",
            &["react-native", "flutter", "javascript"],
            &["android", "ios", "swift", "kotlin"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        SkillCatalog::default().validate().unwrap();
    }

    #[test]
    fn test_default_synonyms_are_disjoint() {
        let catalog = SkillCatalog::default();
        let mut seen = HashSet::new();
        for skill in catalog.taxonomy().skills() {
            for synonym in &skill.synonyms {
                assert!(seen.insert(synonym.clone()), "'{synonym}' listed twice");
            }
        }
    }

    #[test]
    fn test_normalize_maps_synonym_to_canonical() {
        let catalog = SkillCatalog::default();
        assert_eq!(catalog.taxonomy().normalize("reactjs"), Some("react"));
        assert_eq!(catalog.taxonomy().normalize("express"), Some("nodejs"));
        assert_eq!(catalog.taxonomy().normalize("cobol"), None);
    }

    #[test]
    fn test_overlap_first_skill_wins_but_fails_validation() {
        let catalog = SkillCatalog::new(
            vec![skill("alpha", &["shared", "a"]), skill("beta", &["shared", "b"])],
            vec![role("r", &["alpha"], &[])],
            DEFAULT_ROLE,
        );
        assert_eq!(catalog.taxonomy().normalize("shared"), Some("alpha"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::OverlappingSynonym { .. })
        ));
    }

    #[test]
    fn test_empty_role_is_rejected() {
        let err = SkillCatalog::validated(
            vec![skill("alpha", &["a"])],
            vec![role("empty", &[], &[])],
            DEFAULT_ROLE,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::EmptyRole(name) if name == "empty"));
    }

    #[test]
    fn test_unknown_skill_in_role_is_rejected() {
        let err = SkillCatalog::validated(
            vec![skill("alpha", &["a"])],
            vec![role("r", &["alpha", "ghost"], &[])],
            DEFAULT_ROLE,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSkill { skill, .. } if skill == "ghost"));
    }

    #[test]
    fn test_from_json_lowercases_and_defaults_role() {
        let raw = r#"{
            "skills": [{"name": "Rust", "synonyms": ["Rust", "rustlang"]}],
            "roles": [{"name": "Systems", "skills": ["rust"]}]
        }"#;
        let catalog = SkillCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.taxonomy().normalize("rustlang"), Some("rust"));
        assert_eq!(catalog.roles()[0].name, "systems");
        assert_eq!(catalog.default_role(), DEFAULT_ROLE);
    }

    #[test]
    fn test_from_json_rejects_malformed_file() {
        assert!(matches!(
            SkillCatalog::from_json("{\"skills\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
