//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use depot_core::AppError;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Storage path already exists: {0}")]
    AlreadyExists(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of stored bytes, yielded in chunks.
pub type ByteStream = Pin<Box<dyn futures::Stream<Item = Result<Bytes, StorageError>> + Send>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                AppError::NotFound(format!("Stored file not found: {}", path))
            }
            other => AppError::StorageIo(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// The upload core only needs to put new bytes somewhere unique and get
/// them back later; every backend must honor:
///
/// - `write` never overwrites: an existing path is an `AlreadyExists` error.
/// - `read` reports a missing or unreadable object as `NotFound`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` for the object `id` and return its storage path.
    ///
    /// The path is derived from `id` and `original_name`, so distinct ids
    /// never collide.
    async fn write(&self, id: Uuid, original_name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Stream the bytes stored at `storage_path`.
    async fn read(&self, storage_path: &str) -> StorageResult<ByteStream>;

    /// Read the whole object into memory.
    async fn read_all(&self, storage_path: &str) -> StorageResult<Vec<u8>>;
}

/// Drain a [`ByteStream`] into a single buffer.
pub async fn collect_stream<S>(mut stream: S) -> StorageResult<Vec<u8>>
where
    S: Stream<Item = Result<Bytes, StorageError>> + Unpin,
{
    use futures::StreamExt;

    let mut buffer = Vec::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer)
}
