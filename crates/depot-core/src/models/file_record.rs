use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// Lifecycle tag of a stored object.
///
/// The only transition is `Uploaded -> Failed`; `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FileStatus {
    Uploaded,
    Failed,
}

impl FromStr for FileStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Uploaded" => Ok(FileStatus::Uploaded),
            "Failed" => Ok(FileStatus::Failed),
            _ => Err(AppError::Internal(format!("Invalid file status: {}", s))),
        }
    }
}

impl Display for FileStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileStatus::Uploaded => write!(f, "Uploaded"),
            FileStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Metadata of one stored object, original or preview.
///
/// Previews point back at their original through `preview_of`; originals
/// point at their preview through `preview_ref`. A record never carries both,
/// which keeps preview chains at depth one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub storage_path: String,
    pub status: FileStatus,
    pub preview_ref: Option<Uuid>,
    pub preview_of: Option<Uuid>,
}

impl FileRecord {
    /// Record for freshly stored upload bytes.
    pub fn new_upload(
        id: Uuid,
        name: impl Into<String>,
        size_bytes: i64,
        media_type: impl Into<String>,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            size_bytes,
            media_type: media_type.into(),
            created_at: Utc::now(),
            storage_path: storage_path.into(),
            status: FileStatus::Uploaded,
            preview_ref: None,
            preview_of: None,
        }
    }

    /// Record for a preview derived from `original_id`.
    pub fn new_preview(
        id: Uuid,
        original_id: Uuid,
        name: impl Into<String>,
        size_bytes: i64,
        media_type: impl Into<String>,
        storage_path: impl Into<String>,
    ) -> Self {
        Self {
            preview_of: Some(original_id),
            ..Self::new_upload(id, name, size_bytes, media_type, storage_path)
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview_of.is_some()
    }

    pub fn is_image(&self) -> bool {
        self.media_type
            .starts_with(crate::constants::IMAGE_CONTENT_TYPE_PREFIX)
    }

    /// Whether a preview may still be attached to this record.
    pub fn can_accept_preview(&self) -> Result<(), AppError> {
        if self.is_preview() {
            return Err(AppError::Conflict(format!(
                "File {} is itself a preview and cannot be previewed",
                self.id
            )));
        }
        if self.status == FileStatus::Failed {
            return Err(AppError::Conflict(format!(
                "File {} is in a failed state",
                self.id
            )));
        }
        if let Some(existing) = self.preview_ref {
            return Err(AppError::Conflict(format!(
                "File {} already has preview {}",
                self.id, existing
            )));
        }
        Ok(())
    }

    /// Link `preview` as this record's preview.
    pub fn attach_preview(&mut self, preview: &FileRecord) -> Result<(), AppError> {
        self.can_accept_preview()?;
        if preview.preview_ref.is_some() {
            return Err(AppError::Conflict(format!(
                "Preview {} has a preview of its own",
                preview.id
            )));
        }
        if preview.preview_of != Some(self.id) {
            return Err(AppError::Conflict(format!(
                "File {} is not a preview of {}",
                preview.id, self.id
            )));
        }
        self.preview_ref = Some(preview.id);
        Ok(())
    }

    /// Move the record to the terminal `Failed` state.
    pub fn mark_failed(&mut self) {
        self.status = FileStatus::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn original() -> FileRecord {
        let id = Uuid::new_v4();
        FileRecord::new_upload(id, "cat.png", 128, "image/png", format!("{}_cat.png", id))
    }

    fn preview_for(original: &FileRecord) -> FileRecord {
        let id = Uuid::new_v4();
        FileRecord::new_preview(
            id,
            original.id,
            "cat.png_preview.jpg",
            64,
            "image/jpeg",
            format!("{}_cat.png_preview.jpg", id),
        )
    }

    #[test]
    fn test_new_upload_defaults() {
        let record = original();
        assert_eq!(record.status, FileStatus::Uploaded);
        assert!(record.preview_ref.is_none());
        assert!(!record.is_preview());
        assert!(record.is_image());
    }

    #[test]
    fn test_attach_preview_links_original() {
        let mut record = original();
        let preview = preview_for(&record);

        record.attach_preview(&preview).unwrap();

        assert_eq!(record.preview_ref, Some(preview.id));
        assert!(preview.preview_ref.is_none());
    }

    #[test]
    fn test_attach_preview_rejects_previewing_a_preview() {
        let record = original();
        let mut preview = preview_for(&record);
        let nested = FileRecord::new_preview(
            Uuid::new_v4(),
            preview.id,
            "nested.jpg",
            1,
            "image/jpeg",
            "nested",
        );

        let err = preview.attach_preview(&nested).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(preview.preview_ref.is_none());
    }

    #[test]
    fn test_attach_preview_only_once() {
        let mut record = original();
        let first = preview_for(&record);
        let second = preview_for(&record);

        record.attach_preview(&first).unwrap();
        assert!(record.attach_preview(&second).is_err());
        assert_eq!(record.preview_ref, Some(first.id));
    }

    #[test]
    fn test_attach_preview_rejects_foreign_preview() {
        let mut record = original();
        let other = original();
        let preview = preview_for(&other);

        assert!(record.attach_preview(&preview).is_err());
    }

    #[test]
    fn test_failed_record_never_gains_preview() {
        let mut record = original();
        let preview = preview_for(&record);
        record.mark_failed();

        assert!(record.attach_preview(&preview).is_err());
        assert_eq!(record.status, FileStatus::Failed);
        assert!(record.preview_ref.is_none());
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [FileStatus::Uploaded, FileStatus::Failed] {
            assert_eq!(status.to_string().parse::<FileStatus>().unwrap(), status);
        }
        assert!("Pending".parse::<FileStatus>().is_err());
    }
}
