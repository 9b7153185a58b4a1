use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use depot_core::{AppError, FileResponse};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Map a multipart read failure, keeping body-limit overruns distinct.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, err.body_text()))
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
    }
}

/// File extracted from a multipart request.
struct MultipartFile {
    data: Vec<u8>,
    name: String,
    content_type: String,
}

/// Read the single field named `file`.
async fn extract_multipart_file(mut multipart: Multipart) -> Result<MultipartFile, AppError> {
    let mut file: Option<MultipartFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        file = Some(MultipartFile {
            data: data.to_vec(),
            name,
            content_type,
        });
    }

    file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}

/// Upload a file
///
/// Stores the `file` field of a multipart form. Image uploads get a preview
/// attached when one can be generated; a failed preview does not fail the
/// upload.
#[utoipa::path(
    post,
    path = "/api/v0/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File uploaded", body = FileResponse),
        (status = 400, description = "Empty or malformed upload", body = ErrorResponse),
        (status = 413, description = "File too large"),
        (status = 415, description = "File type not allowed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;

    let record = state
        .upload
        .upload(file.data, file.name, file.content_type)
        .await??;
    let (record, preview) = state.upload.get_with_preview(record.id).await??;

    Ok((
        StatusCode::CREATED,
        Json(FileResponse::new(record, preview)),
    ))
}
