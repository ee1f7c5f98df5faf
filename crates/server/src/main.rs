mod api;
mod cli;
mod db;
mod router;
mod scheduler;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use jobfeed_core::Config;
use jobfeed_ingest::{FileJobSource, HttpJobSource, IngestRunner, IngestionJob, JobSource, JobStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::scheduler::Scheduler;
use crate::state::AppState;

fn load_config() -> Config {
    jobfeed_core::config::load_dotenv();
    Config::from_env()
}

fn build_job(config: &Config, source: Arc<dyn JobSource>, store: Arc<dyn JobStore>) -> IngestionJob {
    IngestionJob::new(source, store, config.refresh.validation_policy)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = db::init_store(&config.persistence).await?;
    let source = HttpJobSource::from_config(&config.source).context("failed to build source client")?;
    let runner = Arc::new(IngestRunner::new(build_job(&config, Arc::new(source), store)));

    let scheduler = Scheduler::new(runner.clone(), &config.refresh.cron)
        .with_context(|| format!("invalid REFRESH_CRON_EXPRESSION '{}'", config.refresh.cron))?;
    let scheduler = scheduler.start(config.refresh.run_on_start);

    let state = Arc::new(AppState::new(runner));
    let app = router::build_router(state, &config.server.cors_origin);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    scheduler.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn ingest(config: Config, from_file: Option<PathBuf>) -> anyhow::Result<()> {
    let store = db::init_store(&config.persistence).await?;
    if !config.persistence.is_configured() {
        warn!("one-off ingest into the in-memory store; results are discarded on exit");
    }

    let source: Arc<dyn JobSource> = match from_file {
        Some(path) => Arc::new(FileJobSource::new(path)),
        None => Arc::new(HttpJobSource::from_config(&config.source).context("failed to build source client")?),
    };

    let report = build_job(&config, source, store).run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = load_config();
    config.log_summary();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Ingest { from_file } => ingest(config, from_file).await,
        Command::Migrate => db::migrate(&config.persistence).await,
    }
}
