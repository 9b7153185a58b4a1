use std::sync::Arc;
use std::time::Instant;

use depot_core::{AppError, FileRecord, UploadConfig};
use depot_db::FileRecordRepository;
use depot_processing::{MediaValidator, PreviewGenerator};
use depot_storage::{ByteStream, Storage};
use depot_worker::{JobHandle, WorkerPool};
use uuid::Uuid;

/// A stored file opened for reading.
pub struct StoredFile {
    pub record: FileRecord,
    pub stream: ByteStream,
}

/// Upload orchestrator
///
/// Sequences validation, the storage write, the metadata save and the
/// best-effort preview step. Each call is submitted to the worker pool and
/// returns a [`JobHandle`]; the job runs to completion even if the handle is
/// dropped.
#[derive(Clone)]
pub struct UploadService {
    core: Arc<UploadCore>,
    pool: WorkerPool,
}

struct UploadCore {
    validator: MediaValidator,
    storage: Arc<dyn Storage>,
    repository: Arc<dyn FileRecordRepository>,
    previews: PreviewGenerator,
    preview_scale: f64,
}

impl UploadService {
    pub fn new(
        config: &UploadConfig,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn FileRecordRepository>,
        pool: WorkerPool,
    ) -> Self {
        let previews = PreviewGenerator::new(repository.clone(), storage.clone(), config);
        Self {
            core: Arc::new(UploadCore {
                validator: MediaValidator::new(config.allowed_content_types.clone()),
                storage,
                repository,
                previews,
                preview_scale: config.preview_scale,
            }),
            pool,
        }
    }

    /// Store `data` as a new file and, for images, attach a preview.
    pub fn upload(
        &self,
        data: Vec<u8>,
        name: String,
        content_type: String,
    ) -> JobHandle<Result<FileRecord, AppError>> {
        let core = self.core.clone();
        self.pool
            .submit(async move { core.upload(data, name, content_type).await })
    }

    pub fn get_by_id(&self, id: Uuid) -> JobHandle<Result<FileRecord, AppError>> {
        let core = self.core.clone();
        self.pool.submit(async move { core.get_by_id(id).await })
    }

    /// Fetch a record together with its preview record, if any.
    pub fn get_with_preview(
        &self,
        id: Uuid,
    ) -> JobHandle<Result<(FileRecord, Option<FileRecord>), AppError>> {
        let core = self.core.clone();
        self.pool.submit(async move { core.get_with_preview(id).await })
    }

    pub fn read_bytes(&self, id: Uuid) -> JobHandle<Result<StoredFile, AppError>> {
        let core = self.core.clone();
        self.pool.submit(async move { core.read_bytes(id).await })
    }

    /// Generate and attach a preview for an existing image record.
    ///
    /// Unlike the preview step of [`upload`](Self::upload), failures are
    /// returned to the caller.
    pub fn create_preview(
        &self,
        id: Uuid,
        scale: Option<f64>,
    ) -> JobHandle<Result<FileRecord, AppError>> {
        let core = self.core.clone();
        self.pool
            .submit(async move { core.create_preview(id, scale).await })
    }

    /// Stop accepting new jobs.
    pub fn shutdown(&self) {
        self.pool.close();
    }
}

impl UploadCore {
    #[tracing::instrument(skip(self, data), fields(name = %name, size_bytes = data.len()))]
    async fn upload(
        &self,
        data: Vec<u8>,
        name: String,
        content_type: String,
    ) -> Result<FileRecord, AppError> {
        let start = Instant::now();

        self.validator
            .validate(&content_type, data.len())
            .map_err(|e| {
                tracing::debug!(error = %e, content_type = %content_type, "Upload rejected");
                AppError::from(e)
            })?;

        let id = Uuid::new_v4();
        let size_bytes = data.len() as i64;
        let storage_path = self.storage.write(id, &name, data).await?;

        let mut record = FileRecord::new_upload(id, name, size_bytes, content_type, storage_path);
        self.repository.save(&record).await?;

        if record.is_image() {
            if let Err(e) = self.attach_new_preview(&mut record, self.preview_scale).await {
                tracing::warn!(
                    file_id = %record.id,
                    error = %e,
                    "Preview generation failed; upload kept without preview"
                );
            }
        }

        tracing::info!(
            file_id = %record.id,
            media_type = %record.media_type,
            storage_path = %record.storage_path,
            has_preview = record.preview_ref.is_some(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "File uploaded"
        );

        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<FileRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", id)))
    }

    async fn get_with_preview(
        &self,
        id: Uuid,
    ) -> Result<(FileRecord, Option<FileRecord>), AppError> {
        let record = self.get_by_id(id).await?;

        let preview = match record.preview_ref {
            Some(preview_id) => {
                let preview = self.repository.find_by_id(preview_id).await?;
                if preview.is_none() {
                    tracing::debug!(file_id = %id, preview_id = %preview_id, "Dangling preview reference");
                }
                preview
            }
            None => None,
        };

        Ok((record, preview))
    }

    async fn read_bytes(&self, id: Uuid) -> Result<StoredFile, AppError> {
        let record = self.get_by_id(id).await?;
        let stream = self.storage.read(&record.storage_path).await?;
        Ok(StoredFile { record, stream })
    }

    #[tracing::instrument(skip(self), fields(file_id = %id))]
    async fn create_preview(&self, id: Uuid, scale: Option<f64>) -> Result<FileRecord, AppError> {
        let mut record = self.get_by_id(id).await?;

        record.can_accept_preview()?;
        if !record.is_image() {
            return Err(AppError::UnsupportedMediaType(record.media_type.clone()));
        }

        self.attach_new_preview(&mut record, scale.unwrap_or(self.preview_scale))
            .await
    }

    /// Generate a preview for `record`, link it and re-save the original.
    ///
    /// `record` only gains the reference once the re-save succeeded.
    async fn attach_new_preview(
        &self,
        record: &mut FileRecord,
        scale: f64,
    ) -> Result<FileRecord, AppError> {
        let preview = self.previews.generate_preview(record.id, scale).await?;

        let mut linked = record.clone();
        linked.attach_preview(&preview)?;
        self.repository.save(&linked).await?;
        *record = linked;

        Ok(preview)
    }
}
