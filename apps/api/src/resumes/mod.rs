//! Resume uploads: multipart parsing, PDF text extraction, skill analysis and storage.

pub mod handlers;
pub mod upload;
