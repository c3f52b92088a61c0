//! CORS layer construction.

use axum::http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::web::middleware::auth::USER_ID_HEADER;

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Wide-open layer without credentials, used when no origins are configured.
fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers(Any)
        .allow_origin(Any)
}

/// Build the CORS layer for the configured origins.
///
/// With an explicit origin list the layer allows credentials and restricts
/// headers to the ones the API actually reads. An empty list (or one where
/// no entry parses as a valid origin) yields the permissive layer instead.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if allowed.is_empty() {
        return permissive();
    }

    CorsLayer::new()
        .allow_methods(METHODS)
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true)
        .allow_origin(allowed)
}
