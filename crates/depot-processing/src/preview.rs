//! Preview generation for stored images.

use std::sync::Arc;
use std::time::Instant;

use depot_core::constants::{PREVIEW_CONTENT_TYPE, PREVIEW_NAME_SUFFIX};
use depot_core::{AppError, FileRecord, UploadConfig};
use depot_db::FileRecordRepository;
use depot_storage::Storage;
use uuid::Uuid;

use crate::image::PreviewImage;

/// Derives a scaled-down JPEG copy of a stored image as a new record.
///
/// The original record is only read. Linking the preview back to it is the
/// caller's job.
#[derive(Clone)]
pub struct PreviewGenerator {
    repository: Arc<dyn FileRecordRepository>,
    storage: Arc<dyn Storage>,
    jpeg_quality: u8,
}

impl PreviewGenerator {
    pub fn new(
        repository: Arc<dyn FileRecordRepository>,
        storage: Arc<dyn Storage>,
        config: &UploadConfig,
    ) -> Self {
        Self {
            repository,
            storage,
            jpeg_quality: config.preview_jpeg_quality,
        }
    }

    /// Render, store and save a preview of `original_id` at `scale`.
    ///
    /// Fails with `NotFound` for an unknown record or missing bytes, `Decode`
    /// when the bytes are not a readable image, `InvalidScale` when the scale
    /// is out of range or collapses a dimension to zero, and `Encode` or
    /// `StorageIo` when the result cannot be produced or written.
    #[tracing::instrument(skip(self), fields(file_id = %original_id))]
    pub async fn generate_preview(
        &self,
        original_id: Uuid,
        scale: f64,
    ) -> Result<FileRecord, AppError> {
        PreviewImage::validate_scale(scale)?;
        let start = Instant::now();

        let original = self
            .repository
            .find_by_id(original_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", original_id)))?;

        let data = self.storage.read_all(&original.storage_path).await?;

        let quality = self.jpeg_quality;
        let rendered =
            tokio::task::spawn_blocking(move || PreviewImage::render(&data, scale, quality))
                .await
                .map_err(|e| AppError::Internal(format!("Preview task failed: {}", e)))??;

        let preview_id = Uuid::new_v4();
        let name = format!("{}{}", original.name, PREVIEW_NAME_SUFFIX);
        let size_bytes = rendered.data.len() as i64;
        let storage_path = self.storage.write(preview_id, &name, rendered.data).await?;

        let preview = FileRecord::new_preview(
            preview_id,
            original.id,
            name,
            size_bytes,
            PREVIEW_CONTENT_TYPE,
            storage_path,
        );
        self.repository.save(&preview).await?;

        tracing::info!(
            preview_id = %preview.id,
            storage_path = %preview.storage_path,
            width = rendered.width,
            height = rendered.height,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Preview generated"
        );

        Ok(preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depot_core::FileStatus;
    use depot_db::InMemoryFileRecordRepository;
    use depot_storage::LocalStorage;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        repository: Arc<InMemoryFileRecordRepository>,
        storage: Arc<LocalStorage>,
        generator: PreviewGenerator,
    }

    async fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let repository = Arc::new(InMemoryFileRecordRepository::new());
        let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
        let generator = PreviewGenerator::new(
            repository.clone(),
            storage.clone(),
            &UploadConfig::default(),
        );
        Fixture {
            _dir: dir,
            repository,
            storage,
            generator,
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    async fn store(fx: &Fixture, name: &str, media_type: &str, data: Vec<u8>) -> FileRecord {
        let id = Uuid::new_v4();
        let size = data.len() as i64;
        let path = fx.storage.write(id, name, data).await.unwrap();
        let record = FileRecord::new_upload(id, name, size, media_type, path);
        fx.repository.save(&record).await.unwrap();
        record
    }

    #[tokio::test]
    async fn test_generate_preview_creates_scaled_jpeg_record() {
        let fx = fixture().await;
        let original = store(&fx, "cat.png", "image/png", png(64, 33)).await;

        let preview = fx.generator.generate_preview(original.id, 0.5).await.unwrap();

        assert_ne!(preview.id, original.id);
        assert_eq!(preview.name, "cat.png_preview.jpg");
        assert_eq!(preview.media_type, "image/jpeg");
        assert_eq!(preview.status, FileStatus::Uploaded);
        assert_eq!(preview.preview_of, Some(original.id));
        assert!(preview.preview_ref.is_none());

        let bytes = fx.storage.read_all(&preview.storage_path).await.unwrap();
        assert_eq!(bytes.len() as i64, preview.size_bytes);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));

        let saved = fx.repository.find_by_id(preview.id).await.unwrap();
        assert_eq!(saved, Some(preview));
    }

    #[tokio::test]
    async fn test_generate_preview_leaves_original_untouched() {
        let fx = fixture().await;
        let original = store(&fx, "a.png", "image/png", png(10, 10)).await;

        fx.generator.generate_preview(original.id, 0.5).await.unwrap();

        let stored = fx.repository.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let fx = fixture().await;
        let err = fx
            .generator
            .generate_preview(Uuid::new_v4(), 0.5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_non_image_bytes_fail_to_decode() {
        let fx = fixture().await;
        let original = store(&fx, "fake.png", "image/png", b"not really a png".to_vec()).await;

        let err = fx
            .generator
            .generate_preview(original.id, 0.5)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Decode(_)));
        assert_eq!(fx.repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_tiny_image_is_invalid_scale() {
        let fx = fixture().await;
        let original = store(&fx, "dot.png", "image/png", png(1, 1)).await;

        let err = fx
            .generator
            .generate_preview(original.id, 0.5)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidScale(_)));
    }
}
