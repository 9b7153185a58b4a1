//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, HTTP_CONCURRENCY_LIMIT};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use depot_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let file_routes = Router::new()
        .route("/files", post(handlers::file_upload::upload_file))
        .route("/files/{id}", get(handlers::file_get::get_file))
        .route(
            "/files/{id}/file",
            get(handlers::file_download::download_file),
        )
        .route(
            "/files/{id}/preview",
            post(handlers::file_preview::create_preview),
        )
        .with_state(state);

    tracing::info!(
        max_upload_size_bytes = config.max_upload_size_bytes,
        http_concurrency_limit = HTTP_CONCURRENCY_LIMIT,
        "Routes configured"
    );

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest(API_PREFIX, file_routes)
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}
