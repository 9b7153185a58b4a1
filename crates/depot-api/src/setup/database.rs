//! Metadata store selection

use anyhow::Result;
use depot_core::Config;
use depot_db::{
    setup_database, FileRecordRepository, InMemoryFileRecordRepository, PgFileRecordRepository,
};
use std::sync::Arc;

/// PostgreSQL when `DATABASE_URL` is set, otherwise an in-process map.
pub async fn setup_repository(config: &Config) -> Result<Arc<dyn FileRecordRepository>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool =
                setup_database(url, config.db_max_connections, config.db_timeout_seconds).await?;
            Ok(Arc::new(PgFileRecordRepository::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; file metadata is kept in memory only");
            Ok(Arc::new(InMemoryFileRecordRepository::new()))
        }
    }
}
