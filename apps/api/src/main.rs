mod applications;
mod config;
mod db;
mod errors;
mod jobs;
mod matching;
mod models;
mod resumes;
mod routes;
mod skills;
mod state;
mod statistics;
mod storage;
mod students;
mod users;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::skills::catalog::SkillCatalog;
use crate::state::AppState;
use crate::storage::{BlobStore, DisabledBlobStore, S3BlobStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Placement API v{}", env!("CARGO_PKG_VERSION"));

    // Skill taxonomy and role table; a broken catalog is a startup error
    let catalog = load_catalog(&config)?;
    info!(
        "Skill catalog loaded: {} skills, {} roles (default role: {})",
        catalog.taxonomy().skills().len(),
        catalog.roles().len(),
        catalog.default_role()
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize blob storage (S3 / MinIO when a bucket is configured)
    let blobs: Arc<dyn BlobStore> = match &config.s3 {
        Some(s3) => Arc::new(S3BlobStore::from_config(s3).await),
        None => {
            info!("S3_BUCKET not set; resume PDFs will not be stored");
            Arc::new(DisabledBlobStore)
        }
    };

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        catalog: Arc::new(catalog),
        blobs,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_catalog(config: &Config) -> Result<SkillCatalog> {
    let catalog = match &config.skill_catalog_path {
        Some(path) => SkillCatalog::from_file(path)
            .with_context(|| format!("failed to load skill catalog from {}", path.display()))?,
        None => SkillCatalog::default(),
    };
    catalog.validate().context("skill catalog is invalid")?;
    Ok(catalog)
}
