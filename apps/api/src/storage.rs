//! Blob storage for uploaded resume PDFs and mirrored analysis documents.
//!
//! `AppState` holds an `Arc<dyn BlobStore>`: `S3BlobStore` when a bucket is
//! configured (AWS or MinIO), `DisabledBlobStore` otherwise.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::S3Config;
use crate::skills::extractor::ResumeAnalysis;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `body` under `key`. Returns the key on success, `None` when the
    /// store is disabled.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<Option<String>>;

    /// Removes `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

pub fn resume_pdf_key(student_id: Uuid, resume_id: Uuid) -> String {
    format!("resumes/{student_id}/{resume_id}.pdf")
}

pub fn analysis_key(resume_id: Uuid) -> String {
    format!("analysis/{resume_id}.json")
}

/// Mirrors a resume analysis as JSON next to the resume.
pub async fn mirror_analysis(
    store: &dyn BlobStore,
    resume_id: Uuid,
    analysis: &ResumeAnalysis,
) -> Result<Option<String>> {
    let body = serde_json::to_vec_pretty(analysis)?;
    store
        .put(&analysis_key(resume_id), Bytes::from(body), "application/json")
        .await
}

/// Runs `op` after `key` was stored; if `op` fails the blob is deleted so no
/// object outlives its row. A failed delete is logged and the original error kept.
pub async fn discard_on_error<T, E, F>(
    store: &dyn BlobStore,
    key: Option<&str>,
    op: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let result = op.await;
    if result.is_err() {
        if let Some(key) = key {
            match store.delete(key).await {
                Ok(()) => info!("Removed orphaned blob {key}"),
                Err(e) => warn!("Failed to remove orphaned blob {key}: {e}"),
            }
        }
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// S3 / MinIO
// ────────────────────────────────────────────────────────────────────────────

pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "placement-static",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!("S3 blob store initialized (bucket: {})", config.bucket);
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<Option<String>> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(Some(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 delete failed: {e}"))?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Disabled
// ────────────────────────────────────────────────────────────────────────────

/// Used when no bucket is configured. Accepts and drops every write.
pub struct DisabledBlobStore;

#[async_trait]
impl BlobStore for DisabledBlobStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<Option<String>> {
        debug!("Blob storage disabled; dropping {} bytes for {key}", body.len());
        Ok(None)
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
