//! Job matching: the shared eligibility predicate and the skill-fit listing filter.

pub mod eligibility;
pub mod handlers;
pub mod job_matcher;
