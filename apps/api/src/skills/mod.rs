//! Skill extraction: the shared skill catalog, the resume analyzer and the job
//! role auto-tagger. Everything here is pure and synchronous.

pub mod catalog;
pub mod extractor;
pub mod handlers;
pub mod role_tagger;
