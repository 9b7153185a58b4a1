use std::collections::HashMap;

use async_trait::async_trait;
use depot_core::{AppError, FileRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::file_record::FileRecordRepository;

/// Process-local metadata store. Records are lost on restart.
#[derive(Default)]
pub struct InMemoryFileRecordRepository {
    records: RwLock<HashMap<Uuid, FileRecord>>,
}

impl InMemoryFileRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FileRecordRepository for InMemoryFileRecordRepository {
    async fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .insert(record.id, record.clone());
        tracing::debug!(file_id = %record.id, "File record saved");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        let id = Uuid::new_v4();
        FileRecord::new_upload(id, name, 3, "text/plain", format!("{}_{}", id, name))
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = InMemoryFileRecordRepository::new();
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let repo = InMemoryFileRecordRepository::new();
        let original = record("a.txt");

        repo.save(&original).await.unwrap();

        assert_eq!(repo.find_by_id(original.id).await.unwrap(), Some(original));
    }

    #[tokio::test]
    async fn test_save_upserts_by_id() {
        let repo = InMemoryFileRecordRepository::new();
        let mut original = record("a.txt");
        repo.save(&original).await.unwrap();

        original.mark_failed();
        repo.save(&original).await.unwrap();
        repo.save(&original).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(stored, original);
    }
}
