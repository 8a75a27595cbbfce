//! Job postings: requirement normalization, posting validation, role tagging at
//! write time and the per-student eligible listing.

pub mod handlers;
pub mod posting;
