//! Storage backend setup

use anyhow::{Context, Result};
use depot_core::Config;
use depot_storage::Storage;
use std::sync::Arc;

/// Create the storage root and return the backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    depot_storage::create_storage(config)
        .await
        .context("Failed to initialize storage")
}
