//! Listing and manual refresh endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jobfeed_core::CanonicalJob;
use jobfeed_ingest::TriggerKind;
use serde::Serialize;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub inserted: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// `GET /jobs`: every stored job, in no particular order.
pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CanonicalJob>>, (StatusCode, Json<MessageResponse>)> {
    match state.store.find_all().await {
        Ok(jobs) => Ok(Json(jobs)),
        Err(e) => {
            error!(error = %e, "failed to read jobs");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse {
                    message: "Error fetching jobs",
                }),
            ))
        }
    }
}

/// `GET /refresh-jobs`: run ingestion now, or wait on the run in progress.
pub async fn refresh_jobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.runner.trigger(TriggerKind::Manual).await {
        Ok(report) => {
            info!(inserted = report.inserted(), "manual refresh completed");
            Ok(Json(RefreshResponse {
                message: "Jobs refreshed successfully!",
                inserted: report.inserted(),
            }))
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "manual refresh failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to refresh jobs",
                }),
            ))
        }
    }
}
