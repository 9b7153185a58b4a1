use crate::{LocalStorage, Storage, StorageError, StorageResult};
use depot_core::Config;
use std::sync::Arc;

/// Create the storage backend described by the configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let root = config.storage_root.trim();
    if root.is_empty() {
        return Err(StorageError::ConfigError(
            "STORAGE_ROOT not configured".to_string(),
        ));
    }

    let storage = LocalStorage::new(root).await?;
    tracing::info!(root = %storage.base_path().display(), "Local storage ready");
    Ok(Arc::new(storage))
}
