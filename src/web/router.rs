//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use super::handlers::{
    delete_file, download_file, get_file, list_files, update_file, upload_file, AppState,
};
use super::middleware::create_cors_layer;

/// Extra request body allowance beyond the file size cap, covering
/// multipart boundaries and field headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// OpenAPI documentation for the file API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::handlers::file::list_files,
        crate::web::handlers::file::get_file,
        crate::web::handlers::file::update_file,
        crate::web::handlers::file::delete_file,
        crate::web::handlers::file::upload_file,
        crate::web::handlers::file::download_file,
    ),
    components(schemas(
        crate::web::dto::UpdateFileRequest,
        crate::web::dto::FileResponse,
        crate::web::dto::FilePageResponse,
        crate::web::dto::UploadResponse,
    )),
    tags(
        (name = "files", description = "File storage, sharing, and download operations")
    )
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = app_state.max_upload_size as usize + MULTIPART_OVERHEAD;

    // File routes
    let file_routes = Router::new()
        .route("/files", get(list_files))
        .route(
            "/files/:id",
            get(get_file).put(update_file).delete(delete_file),
        )
        .route("/uploads", post(upload_file))
        .route("/downloads/:id", get(download_file));

    // Build the main router with middleware
    Router::new()
        .nest("/api/v1", file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the OpenAPI document.
pub fn create_openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

/// Serve the OpenAPI document as JSON.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
