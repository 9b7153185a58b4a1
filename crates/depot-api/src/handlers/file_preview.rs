use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use depot_core::FileResponse;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    /// Scale factor, strictly between 0 and 1. Defaults to the configured preview scale.
    pub scale: Option<f64>,
}

/// Create a preview for an existing image
///
/// Returns the new preview record. The original must be an image without a
/// preview and must not be a preview itself.
#[utoipa::path(
    post,
    path = "/api/v0/files/{id}/preview",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID"),
        PreviewQuery
    ),
    responses(
        (status = 201, description = "Preview created", body = FileResponse),
        (status = 400, description = "Invalid scale", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 409, description = "File already has a preview or is a preview", body = ErrorResponse),
        (status = 415, description = "File is not an image", body = ErrorResponse),
        (status = 422, description = "Stored bytes are not a readable image", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "create_preview"))]
pub async fn create_preview(
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let preview = state.upload.create_preview(id, query.scale).await??;
    Ok((StatusCode::CREATED, Json(FileResponse::from(preview))))
}
