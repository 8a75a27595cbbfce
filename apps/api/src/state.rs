use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::skills::catalog::SkillCatalog;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Skill taxonomy and role table. Loaded once at startup, read-only afterwards.
    pub catalog: Arc<SkillCatalog>,
    /// Resume PDFs and mirrored analyses. Disabled store when no bucket is configured.
    pub blobs: Arc<dyn BlobStore>,
}
