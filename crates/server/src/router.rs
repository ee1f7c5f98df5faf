//! HTTP router construction.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::api;
use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, cors_origin: &str) -> Router {
    Router::new()
        .route("/jobs", get(api::list_jobs))
        .route("/refresh-jobs", get(api::refresh_jobs))
        .route("/health", get(api::health))
        .route("/ingestion/status", get(api::ingestion_status))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

/// `*` allows any origin; anything else is matched exactly.
fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(value))
            .allow_methods([Method::GET]),
        Err(e) => {
            warn!(origin, error = %e, "invalid CORS_ORIGIN, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}
