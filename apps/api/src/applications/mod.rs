//! Student applications: the apply-time eligibility gate, custom-question
//! answers and recruiter review.

pub mod handlers;
pub mod review;
