//! Student profiles: the CGPA and branch the eligibility gate reads.

pub mod handlers;
pub mod profile;
