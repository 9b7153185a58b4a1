//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::upload::UploadService;
use crate::state::AppState;
use anyhow::Result;
use depot_core::Config;
use depot_db::FileRecordRepository;
use depot_storage::Storage;
use depot_worker::WorkerPool;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment,
        storage_root = %config.storage_root,
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let repository = database::setup_repository(&config).await?;

    let state = build_state(config.clone(), repository, storage);
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}

/// Wire the upload service and its worker pool around the given backends.
pub fn build_state(
    config: Config,
    repository: Arc<dyn FileRecordRepository>,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let pool = WorkerPool::new(config.upload_max_workers);
    let upload = UploadService::new(config.upload_config(), storage, repository, pool);
    Arc::new(AppState { config, upload })
}
