//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use depot_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Depot API",
        version = "0.1.0",
        description = "File upload service with automatic image previews"
    ),
    paths(
        handlers::file_upload::upload_file,
        handlers::file_get::get_file,
        handlers::file_download::download_file,
        handlers::file_preview::create_preview,
        handlers::health::health,
    ),
    components(schemas(
        models::FileResponse,
        models::PreviewResponse,
        models::FileStatus,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "files", description = "Upload, fetch and preview files"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
