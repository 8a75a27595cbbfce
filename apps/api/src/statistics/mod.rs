//! Placement statistics: accepted applications grouped by academic year and branch.

pub mod handlers;
pub mod summary;
