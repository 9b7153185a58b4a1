use crate::keys::storage_path_for;
use crate::traits::{ByteStream, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use futures::StreamExt;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Objects are plain files directly under `base_path`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory if absent.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploadedFiles")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Convert a storage path to a filesystem path.
    ///
    /// Storage paths are single components; anything that could escape the
    /// root is rejected.
    fn key_to_path(&self, storage_path: &str) -> StorageResult<PathBuf> {
        if storage_path.is_empty()
            || storage_path.contains("..")
            || storage_path.contains('/')
            || storage_path.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage path contains invalid characters: {}",
                storage_path
            )));
        }

        Ok(self.base_path.join(storage_path))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn write(&self, id: Uuid, original_name: &str, data: Vec<u8>) -> StorageResult<String> {
        let key = storage_path_for(id, original_name);
        let path = self.key_to_path(&key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StorageError::AlreadyExists(key.clone())
                } else {
                    StorageError::WriteFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

        let written = match file.write_all(&data).await {
            Ok(()) => file.sync_all().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            drop(file);
            if let Err(remove_err) = fs::remove_file(&path).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %remove_err,
                    "Failed to remove partially written file"
                );
            }
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            storage_path = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(key)
    }

    async fn read(&self, storage_path: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(storage_path)?;
        let start = std::time::Instant::now();

        let file = fs::File::open(&path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Stored file not readable");
            StorageError::NotFound(storage_path.to_string())
        })?;

        let reader = tokio_util::io::ReaderStream::new(file);

        let key = storage_path.to_string();
        let stream = reader.map(move |result| {
            result.map_err(|e| {
                tracing::error!(
                    storage_path = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    error = %e,
                    "Local storage stream read error"
                );
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(Box::pin(stream))
    }

    async fn read_all(&self, storage_path: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_path)?;
        let start = std::time::Instant::now();

        let data = fs::read(&path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Stored file not readable");
            StorageError::NotFound(storage_path.to_string())
        })?;

        tracing::info!(
            path = %path.display(),
            storage_path = %storage_path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::collect_stream;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_write_read() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let id = Uuid::new_v4();
        let data = b"test data".to_vec();

        let key = storage.write(id, "test.txt", data.clone()).await.unwrap();

        assert_eq!(key, format!("{}_test.txt", id));
        assert!(dir.path().join(&key).exists());

        let read_back = storage.read_all(&key).await.unwrap();
        assert_eq!(data, read_back);
    }

    #[tokio::test]
    async fn test_local_storage_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");

        LocalStorage::new(&root).await.unwrap();

        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_write_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let id = Uuid::new_v4();

        let key = storage.write(id, "a.txt", b"first".to_vec()).await.unwrap();
        let result = storage.write(id, "a.txt", b"second".to_vec()).await;

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(storage.read_all(&key).await.unwrap(), b"first".to_vec());
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let missing = format!("{}_gone.txt", Uuid::new_v4());
        assert!(matches!(
            storage.read(&missing).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.read_all(&missing).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.read_all("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.read("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.read_all("sub\\dir.txt").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_hostile_name_stays_under_root() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        let id = Uuid::new_v4();

        let key = storage
            .write(id, "../../escape.txt", b"x".to_vec())
            .await
            .unwrap();

        assert_eq!(key, format!("{}_escape.txt", id));
        assert!(dir.path().join(&key).exists());
    }

    #[tokio::test]
    async fn test_local_storage_stream_read() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let key = storage
            .write(Uuid::new_v4(), "blob.bin", data.clone())
            .await
            .unwrap();

        let stream = storage.read(&key).await.unwrap();
        let downloaded = collect_stream(stream).await.unwrap();

        assert_eq!(data, downloaded);
    }
}
