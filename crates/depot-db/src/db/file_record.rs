//! File record repository: upsert and lookup for the `files` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use depot_core::{AppError, FileRecord};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Persistence for [`FileRecord`]s, keyed by id.
#[async_trait]
pub trait FileRecordRepository: Send + Sync {
    /// Insert or replace the record with `record.id`.
    async fn save(&self, record: &FileRecord) -> Result<(), AppError>;

    /// Fetch a record by id. A missing id is `Ok(None)`, never an error.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;
}

/// Row type for the files table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct FileRecordRow {
    pub id: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub created_at: DateTime<Utc>,
    pub storage_path: String,
    pub status: String,
    pub preview_ref: Option<Uuid>,
    pub preview_of: Option<Uuid>,
}

impl FileRecordRow {
    pub fn into_file_record(self) -> Result<FileRecord, AppError> {
        Ok(FileRecord {
            id: self.id,
            name: self.name,
            size_bytes: self.size_bytes,
            media_type: self.media_type,
            created_at: self.created_at,
            storage_path: self.storage_path,
            status: self.status.parse()?,
            preview_ref: self.preview_ref,
            preview_of: self.preview_of,
        })
    }
}

#[derive(Clone)]
pub struct PgFileRecordRepository {
    pool: PgPool,
}

impl PgFileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordRepository for PgFileRecordRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "files", db.record_id = %record.id))]
    async fn save(&self, record: &FileRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO files (id, name, size_bytes, media_type, created_at, storage_path, status, preview_ref, preview_of)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                size_bytes = EXCLUDED.size_bytes,
                media_type = EXCLUDED.media_type,
                storage_path = EXCLUDED.storage_path,
                status = EXCLUDED.status,
                preview_ref = EXCLUDED.preview_ref,
                preview_of = EXCLUDED.preview_of
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.size_bytes)
        .bind(&record.media_type)
        .bind(record.created_at)
        .bind(&record.storage_path)
        .bind(record.status.to_string())
        .bind(record.preview_ref)
        .bind(record.preview_of)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row: Option<FileRecordRow> = sqlx::query_as::<Postgres, FileRecordRow>(
            r#"
            SELECT id, name, size_bytes, media_type, created_at, storage_path, status, preview_ref, preview_of
            FROM files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FileRecordRow::into_file_record).transpose()
    }
}
