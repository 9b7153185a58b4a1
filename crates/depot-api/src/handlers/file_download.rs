use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use depot_core::AppError;
use futures::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

/// `attachment` disposition with a quoted filename safe to put in a header.
fn content_disposition(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[utoipa::path(
    get,
    path = "/api/v0/files/{id}/file",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "download_file"))]
pub async fn download_file(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = state.upload.read_bytes(id).await??;

    tracing::debug!(storage_path = %file.record.storage_path, "Streaming file from storage");

    let body_stream = file.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.record.media_type.as_str())
        .header(header::CONTENT_LENGTH, file.record.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&file.record.name),
        )
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}
