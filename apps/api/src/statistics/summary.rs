use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use sqlx::FromRow;

const UNKNOWN: &str = "Unknown";
/// Academic years run July to June.
const ACADEMIC_YEAR_START_MONTH: u32 = 7;

/// One accepted application, joined with its student and job.
#[derive(Debug, Clone, FromRow)]
pub struct PlacementRecord {
    pub student_name: String,
    pub branch: Option<String>,
    pub job_title: String,
    pub posted_by: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub student_name: String,
    pub role: String,
    pub posted_by: String,
    pub branch: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearStats {
    pub branch_wise: BTreeMap<String, u32>,
    pub placements: Vec<Placement>,
}

/// `"2024-25"` for any date from July 2024 through June 2025.
pub fn academic_year_label(at: DateTime<Utc>) -> String {
    let start = if at.month() >= ACADEMIC_YEAR_START_MONTH {
        at.year()
    } else {
        at.year() - 1
    };
    format!("{start}-{:02}", (start + 1).rem_euclid(100))
}

pub fn summarize_placements(records: &[PlacementRecord]) -> BTreeMap<String, YearStats> {
    let mut by_year: BTreeMap<String, YearStats> = BTreeMap::new();

    for record in records {
        let academic_year = academic_year_label(record.applied_at);
        let branch = record
            .branch
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        let stats = by_year.entry(academic_year.clone()).or_default();
        *stats.branch_wise.entry(branch.clone()).or_insert(0) += 1;
        stats.placements.push(Placement {
            student_name: record.student_name.clone(),
            role: record.job_title.clone(),
            posted_by: record.posted_by.clone(),
            branch,
            academic_year,
        });
    }

    by_year
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    fn record(name: &str, branch: Option<&str>, applied_at: DateTime<Utc>) -> PlacementRecord {
        PlacementRecord {
            student_name: name.to_string(),
            branch: branch.map(str::to_string),
            job_title: "SDE Intern".to_string(),
            posted_by: "Acme".to_string(),
            applied_at,
        }
    }

    #[test]
    fn test_academic_year_boundaries() {
        assert_eq!(academic_year_label(at(2024, 7, 1)), "2024-25");
        assert_eq!(academic_year_label(at(2025, 6, 30)), "2024-25");
        assert_eq!(academic_year_label(at(2025, 1, 15)), "2024-25");
        assert_eq!(academic_year_label(at(2099, 9, 1)), "2099-00");
    }

    #[test]
    fn test_groups_by_year_and_branch() {
        let records = vec![
            record("Asha", Some("CSE"), at(2024, 8, 1)),
            record("Ravi", Some("CSE"), at(2025, 2, 1)),
            record("Meera", Some("ECE"), at(2024, 12, 1)),
            record("Kabir", None, at(2025, 9, 1)),
        ];
        let stats = summarize_placements(&records);

        assert_eq!(stats.len(), 2);
        let first = &stats["2024-25"];
        assert_eq!(first.branch_wise["CSE"], 2);
        assert_eq!(first.branch_wise["ECE"], 1);
        assert_eq!(first.placements.len(), 3);
        assert_eq!(first.placements[0].role, "SDE Intern");

        let second = &stats["2025-26"];
        assert_eq!(second.branch_wise["Unknown"], 1);
        assert_eq!(second.placements[0].academic_year, "2025-26");
    }

    #[test]
    fn test_blank_branch_is_unknown() {
        let stats = summarize_placements(&[record("Asha", Some("  "), at(2024, 8, 1))]);
        assert_eq!(stats["2024-25"].branch_wise["Unknown"], 1);
    }

    #[test]
    fn test_no_records() {
        assert!(summarize_placements(&[]).is_empty());
    }
}
