//! Single-flight execution of [`IngestionJob`] runs.
//!
//! The scheduler and the manual refresh endpoint both go through
//! [`IngestRunner::trigger`]. At most one run is in flight at a time; a
//! trigger that arrives while a run is in progress joins it and receives the
//! same result. Each run executes on its own tokio task, so dropping a
//! caller (e.g. an HTTP client disconnecting) never cancels it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::IngestError;
use crate::pipeline::{IngestReport, IngestionJob};

/// What caused an ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Startup,
    Scheduled,
    Manual,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors are shared between every caller that joined the run.
pub type RunResult = Result<IngestReport, Arc<IngestError>>;

type SharedRun = Shared<BoxFuture<'static, RunResult>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Summary of a finished run, exposed on the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub id: Uuid,
    pub trigger: TriggerKind,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub report: Option<IngestReport>,
    pub error: Option<String>,
}

struct InFlight {
    id: Uuid,
    done: Arc<AtomicBool>,
    run: SharedRun,
}

pub struct IngestRunner {
    job: Arc<IngestionJob>,
    in_flight: Mutex<Option<InFlight>>,
    last_run: Arc<RwLock<Option<RunRecord>>>,
}

impl IngestRunner {
    pub fn new(job: IngestionJob) -> Self {
        Self {
            job: Arc::new(job),
            in_flight: Mutex::new(None),
            last_run: Arc::new(RwLock::new(None)),
        }
    }

    pub fn job(&self) -> &IngestionJob {
        &self.job
    }

    /// Run ingestion, or join the run already in progress.
    pub async fn trigger(&self, trigger: TriggerKind) -> RunResult {
        self.join_or_start(trigger).await
    }

    pub fn is_running(&self) -> bool {
        let slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .is_some_and(|current| !current.done.load(Ordering::Acquire))
    }

    pub fn last_run(&self) -> Option<RunRecord> {
        self.last_run
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn join_or_start(&self, trigger: TriggerKind) -> SharedRun {
        let mut slot = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(current) = slot.as_ref() {
            if !current.done.load(Ordering::Acquire) {
                info!(run_id = %current.id, trigger = %trigger, "joining in-flight ingestion run");
                return current.run.clone();
            }
        }

        let id = Uuid::new_v4();
        let done = Arc::new(AtomicBool::new(false));
        let job = self.job.clone();
        let last_run = self.last_run.clone();
        let task_done = done.clone();

        let handle = tokio::spawn(async move {
            let started_at = Utc::now();
            info!(run_id = %id, trigger = %trigger, "ingestion run started");

            let result = job.run().await;
            let record = match &result {
                Ok(report) => {
                    info!(
                        run_id = %id,
                        trigger = %trigger,
                        inserted = report.inserted(),
                        dropped = report.dropped,
                        duration_ms = report.duration_ms,
                        "ingestion run completed"
                    );
                    RunRecord {
                        id,
                        trigger,
                        status: RunStatus::Completed,
                        started_at,
                        finished_at: Utc::now(),
                        report: Some(report.clone()),
                        error: None,
                    }
                }
                Err(e) => {
                    error!(run_id = %id, trigger = %trigger, kind = e.kind(), error = %e, "ingestion run failed");
                    RunRecord {
                        id,
                        trigger,
                        status: RunStatus::Failed,
                        started_at,
                        finished_at: Utc::now(),
                        report: None,
                        error: Some(e.to_string()),
                    }
                }
            };

            *last_run.write().unwrap_or_else(|e| e.into_inner()) = Some(record);
            task_done.store(true, Ordering::Release);
            result.map_err(Arc::new)
        });

        let run = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(Arc::new(IngestError::Aborted(e.to_string()))),
            }
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            id,
            done,
            run: run.clone(),
        });
        run
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use jobfeed_core::ValidationPolicy;

    use super::*;
    use crate::pipeline::test_support::{sample_payload, StaticSource};
    use crate::store::{JobStore, MemoryJobStore};

    fn runner_with(source: Arc<StaticSource>, store: Arc<MemoryJobStore>) -> Arc<IngestRunner> {
        Arc::new(IngestRunner::new(IngestionJob::new(
            source,
            store,
            ValidationPolicy::Strict,
        )))
    }

    async fn wait_for_last_run(runner: &IngestRunner) -> RunRecord {
        for _ in 0..200 {
            if let Some(record) = runner.last_run() {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no run was recorded");
    }

    #[tokio::test]
    async fn concurrent_triggers_share_one_run() {
        let source = Arc::new(StaticSource::new(sample_payload()).with_delay(Duration::from_millis(100)));
        let runner = runner_with(source.clone(), Arc::new(MemoryJobStore::new()));

        let (a, b, c) = tokio::join!(
            runner.trigger(TriggerKind::Scheduled),
            runner.trigger(TriggerKind::Manual),
            runner.trigger(TriggerKind::Manual),
        );

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn finished_run_is_not_joined() {
        let source = Arc::new(StaticSource::new(sample_payload()));
        let runner = runner_with(source.clone(), Arc::new(MemoryJobStore::new()));

        runner.trigger(TriggerKind::Manual).await.unwrap();
        runner.trigger(TriggerKind::Manual).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_the_run() {
        let source = Arc::new(StaticSource::new(sample_payload()).gated());
        let store = Arc::new(MemoryJobStore::new());
        let runner = runner_with(source.clone(), store.clone());

        let caller = {
            let runner = runner.clone();
            tokio::spawn(async move { runner.trigger(TriggerKind::Manual).await })
        };
        source.started.notified().await;
        assert!(runner.is_running());
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());
        source.release();

        let record = wait_for_last_run(&runner).await;
        assert_eq!(record.status, RunStatus::Completed);
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failures_are_recorded_and_shared() {
        let source = Arc::new(StaticSource::unreachable());
        let runner = runner_with(source, Arc::new(MemoryJobStore::new()));

        let err = runner.trigger(TriggerKind::Startup).await.unwrap_err();
        assert_eq!(err.kind(), "fetch");

        let record = runner.last_run().unwrap();
        assert_eq!(record.trigger, TriggerKind::Startup);
        assert_eq!(record.status, RunStatus::Failed);
        assert!(record.report.is_none());
        assert!(record.error.unwrap().contains("502"));
    }

    #[test]
    fn trigger_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&TriggerKind::Scheduled).unwrap(), "\"scheduled\"");
        assert_eq!(TriggerKind::Startup.to_string(), "startup");
    }
}
