use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::file_record::{FileRecord, FileStatus};

/// Preview as embedded in a [`FileResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreviewResponse {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub status: FileStatus,
}

impl From<FileRecord> for PreviewResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            size_bytes: record.size_bytes,
            media_type: record.media_type,
            created_at: record.created_at,
            status: record.status,
        }
    }
}

/// API view of a stored file. Storage paths stay server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileResponse {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_ref: Option<Uuid>,
    /// Set when this file is itself a preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_of: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewResponse>,
}

impl FileResponse {
    pub fn new(record: FileRecord, preview: Option<FileRecord>) -> Self {
        Self {
            id: record.id,
            name: record.name,
            size_bytes: record.size_bytes,
            media_type: record.media_type,
            created_at: record.created_at,
            status: record.status,
            preview_ref: record.preview_ref,
            preview_of: record.preview_of,
            preview: preview.map(PreviewResponse::from),
        }
    }
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self::new(record, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_hides_storage_path_and_nests_preview() {
        let original = FileRecord::new_upload(Uuid::new_v4(), "a.png", 10, "image/png", "p1");
        let preview = FileRecord::new_preview(
            Uuid::new_v4(),
            original.id,
            "a.png_preview.jpg",
            4,
            "image/jpeg",
            "p2",
        );

        let json = serde_json::to_value(FileResponse::new(original, Some(preview.clone()))).unwrap();

        assert!(json.get("storage_path").is_none());
        assert_eq!(json["preview"]["id"], preview.id.to_string());
        assert_eq!(json["preview"]["media_type"], "image/jpeg");
        assert_eq!(json["status"], "Uploaded");
    }

    #[test]
    fn test_response_omits_absent_preview() {
        let record = FileRecord::new_upload(Uuid::new_v4(), "a.txt", 1, "text/plain", "p");
        let json = serde_json::to_value(FileResponse::from(record)).unwrap();

        assert!(json.get("preview").is_none());
        assert!(json.get("preview_ref").is_none());
    }
}
