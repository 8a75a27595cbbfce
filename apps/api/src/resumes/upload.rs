//! Upload form validation and PDF text extraction.
//!
//! Extraction is CPU-bound and runs on the blocking pool. A PDF that yields no
//! text is still accepted; its analysis is simply absent.

use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

const TITLE_LEN: (usize, usize) = (2, 100);
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    fn looks_like_pdf(&self) -> bool {
        let declared = self
            .content_type
            .as_deref()
            .map(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            .unwrap_or(false)
            || self
                .filename
                .as_deref()
                .map(|f| f.to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false);
        declared && self.bytes.starts_with(PDF_MAGIC)
    }
}

/// Raw multipart fields, collected before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub student_id: Uuid,
    pub title: String,
    pub file: UploadedFile,
}

impl UploadForm {
    pub fn validate(self, max_bytes: usize) -> Result<ResumeUpload, AppError> {
        let student_id = self
            .user_id
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?
            .parse::<Uuid>()
            .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?;

        let title = self.title.unwrap_or_default().trim().to_string();
        let len = title.chars().count();
        if len < TITLE_LEN.0 || len > TITLE_LEN.1 {
            return Err(AppError::Validation(format!(
                "title must be between {} and {} characters",
                TITLE_LEN.0, TITLE_LEN.1
            )));
        }

        let file = self
            .file
            .ok_or_else(|| AppError::Validation("file is required".to_string()))?;
        if file.bytes.is_empty() {
            return Err(AppError::Validation("file is empty".to_string()));
        }
        if file.bytes.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "file exceeds the {max_bytes} byte limit"
            )));
        }
        if !file.looks_like_pdf() {
            return Err(AppError::Validation("only PDF resumes are accepted".to_string()));
        }

        Ok(ResumeUpload {
            student_id,
            title,
            file,
        })
    }
}

/// Extracts plain text from PDF bytes on the blocking pool.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
        .map_err(|e| AppError::UnprocessableEntity(format!("could not read PDF text: {e}")))
}
