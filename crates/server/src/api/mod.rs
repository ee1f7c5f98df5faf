//! HTTP endpoint modules.

mod health;
mod jobs;

pub use health::{health, ingestion_status};
pub use jobs::{list_jobs, refresh_jobs};
