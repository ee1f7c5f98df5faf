//! Cron-driven background refresh.
//!
//! Sleeps until the next fire time of `REFRESH_CRON_EXPRESSION`, then hands
//! the run to [`IngestRunner`], which joins any refresh already in flight.
//! Optionally triggers one run at startup. Fire times are evaluated in the
//! server's local time zone.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use jobfeed_ingest::{IngestRunner, RunResult, TriggerKind};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Scheduler {
    runner: Arc<IngestRunner>,
    expression: String,
    schedule: Schedule,
}

impl Scheduler {
    /// Fails on an unparseable cron expression; 5-field and 6-field forms are
    /// both accepted.
    pub fn new(runner: Arc<IngestRunner>, expression: &str) -> Result<Self, cron::error::Error> {
        let schedule = parse_cron(expression)?;
        Ok(Self {
            runner,
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn start(self, run_on_start: bool) -> SchedulerHandle {
        let startup = run_on_start.then(|| {
            let runner = self.runner.clone();
            tokio::spawn(async move {
                let result = runner.trigger(TriggerKind::Startup).await;
                debug!(ok = result.is_ok(), "startup ingestion finished");
                result
            })
        });

        let shutdown = Arc::new(Notify::new());
        let task = tokio::spawn(run_loop(self, shutdown.clone()));

        SchedulerHandle {
            startup,
            task,
            shutdown,
        }
    }
}

async fn run_loop(scheduler: Scheduler, shutdown: Arc<Notify>) {
    let Scheduler {
        runner,
        expression,
        schedule,
    } = scheduler;
    info!(cron = %expression, "refresh scheduler started");

    loop {
        let now = Local::now();
        let Some(delay) = delay_until_next(&schedule, now) else {
            warn!(cron = %expression, "refresh scheduler: no upcoming fire time, stopping");
            return;
        };
        debug!(delay_secs = delay.as_secs(), "refresh scheduler: sleeping until next fire time");

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.notified() => {
                info!("refresh scheduler stopped");
                return;
            }
        }

        info!(trigger = "scheduled", "refresh scheduler: triggering ingestion");
        // Spawned so a slow run never delays the next tick or shutdown.
        let runner = runner.clone();
        tokio::spawn(async move {
            let result = runner.trigger(TriggerKind::Scheduled).await;
            debug!(ok = result.is_ok(), "scheduled ingestion finished");
        });
    }
}

pub struct SchedulerHandle {
    startup: Option<JoinHandle<RunResult>>,
    task: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

impl SchedulerHandle {
    /// Wait for the startup run. `None` when it was disabled or already
    /// awaited.
    pub async fn startup_complete(&mut self) -> Option<RunResult> {
        let handle = self.startup.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "startup ingestion task did not complete");
                None
            }
        }
    }

    /// Stop the timer loop. Runs already handed to the runner finish on their
    /// own.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        if let Err(e) = self.task.await {
            warn!(error = %e, "refresh scheduler task ended abnormally");
        }
    }
}

/// Parse a cron expression, accepting both standard 5-field and 6-field
/// (with seconds) formats.
pub fn parse_cron(expr: &str) -> Result<Schedule, cron::error::Error> {
    let parts: Vec<&str> = expr.split_whitespace().collect();
    if parts.len() == 5 {
        let six_field = format!("0 {}", expr);
        Schedule::from_str(&six_field)
    } else {
        Schedule::from_str(expr)
    }
}

/// Time from `now` to the schedule's next fire time, with the cron fields
/// read in `now`'s time zone.
pub fn delay_until_next<Tz: TimeZone>(schedule: &Schedule, now: DateTime<Tz>) -> Option<Duration> {
    let next = schedule.after(&now).next()?;
    Some((next - now).to_std().unwrap_or(Duration::ZERO))
}
