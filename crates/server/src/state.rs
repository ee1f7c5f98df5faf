use std::sync::Arc;

use jobfeed_ingest::{IngestRunner, JobStore};

/// Shared handler state. The store handle is the same one the runner's
/// ingestion job writes to.
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub runner: Arc<IngestRunner>,
}

impl AppState {
    pub fn new(runner: Arc<IngestRunner>) -> Self {
        Self {
            store: runner.job().store().clone(),
            runner,
        }
    }
}
