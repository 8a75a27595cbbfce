//! Portal accounts: registration and the recruiter profile.

pub mod handlers;
pub mod registration;
