use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use jobfeed_ingest::RunRecord;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.backend(),
    })
}

#[derive(Serialize)]
pub struct IngestionStatusResponse {
    pub running: bool,
    pub last_run: Option<RunRecord>,
}

/// Whether a refresh is in flight, plus the outcome of the last finished one.
pub async fn ingestion_status(State(state): State<Arc<AppState>>) -> Json<IngestionStatusResponse> {
    Json(IngestionStatusResponse {
        running: state.runner.is_running(),
        last_run: state.runner.last_run(),
    })
}
