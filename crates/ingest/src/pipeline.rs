//! One ingestion run: fetch → normalize → filter → replace.
//!
//! The store is only written after the whole batch has been fetched and
//! prepared. Fetch failures, malformed payloads and batches with no valid
//! jobs leave the stored jobs untouched.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use jobfeed_core::{CanonicalJob, ValidationPolicy};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{FetchError, IngestError};
use crate::filter;
use crate::normalize::normalize;
use crate::source::JobSource;
use crate::store::JobStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// The store now holds exactly this run's jobs.
    Replaced { inserted: u64 },
    /// Nothing survived the filter; the store was left as it was.
    NoValidJobs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records in the payload, excluding the metadata element.
    pub received: usize,
    /// Records rejected by the mandatory-field filter.
    pub dropped: usize,
    /// Valid records whose id repeated an earlier record.
    pub duplicates: usize,
    pub outcome: IngestOutcome,
    pub duration_ms: u64,
}

impl IngestReport {
    pub fn inserted(&self) -> u64 {
        match self.outcome {
            IngestOutcome::Replaced { inserted } => inserted,
            IngestOutcome::NoValidJobs => 0,
        }
    }
}

/// A batch ready to be written.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PreparedBatch {
    pub jobs: Vec<CanonicalJob>,
    pub dropped: usize,
    pub duplicates: usize,
}

/// Normalize and filter raw records, keeping the first record for each id.
pub fn prepare_batch(policy: ValidationPolicy, records: &[Value]) -> PreparedBatch {
    let mut batch = PreparedBatch::default();
    let mut seen = HashSet::with_capacity(records.len());

    for record in records {
        let candidate = normalize(record);
        if !filter::keep(policy, record, &candidate) {
            batch.dropped += 1;
            continue;
        }
        let Some(job) = candidate.into_job() else {
            batch.dropped += 1;
            continue;
        };
        if !seen.insert(job.id) {
            batch.duplicates += 1;
            continue;
        }
        batch.jobs.push(job);
    }

    batch
}

/// Split the source payload into job records, skipping the leading
/// metadata element.
pub fn payload_records(payload: Value) -> Result<Vec<Value>, FetchError> {
    match payload {
        Value::Array(items) if !items.is_empty() => Ok(items.into_iter().skip(1).collect()),
        Value::Array(_) => Err(FetchError::UnexpectedShape("empty array".to_string())),
        other => Err(FetchError::UnexpectedShape(format!(
            "expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub struct IngestionJob {
    source: Arc<dyn JobSource>,
    store: Arc<dyn JobStore>,
    policy: ValidationPolicy,
}

impl IngestionJob {
    pub fn new(source: Arc<dyn JobSource>, store: Arc<dyn JobStore>, policy: ValidationPolicy) -> Self {
        Self { source, store, policy }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub async fn run(&self) -> Result<IngestReport, IngestError> {
        let start = Instant::now();
        info!(source = %self.source.describe(), policy = %self.policy, "fetching jobs");

        let payload = self.source.fetch().await?;
        let records = payload_records(payload)?;
        let received = records.len();

        let batch = prepare_batch(self.policy, &records);
        info!(
            received,
            valid = batch.jobs.len(),
            dropped = batch.dropped,
            duplicates = batch.duplicates,
            "source payload prepared"
        );

        let outcome = if batch.jobs.is_empty() {
            warn!(received, "no valid jobs in payload, keeping stored jobs");
            IngestOutcome::NoValidJobs
        } else {
            let inserted = self.store.replace_all(&batch.jobs).await?;
            info!(inserted, store = self.store.backend(), "jobs replaced");
            IngestOutcome::Replaced { inserted }
        };

        Ok(IngestReport {
            received,
            dropped: batch.dropped,
            duplicates: batch.duplicates,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
