use std::sync::Arc;

use anyhow::Context;
use jobfeed_core::config::PersistenceConfig;
use jobfeed_ingest::{JobStore, MemoryJobStore, PgJobStore};
use tracing::{info, warn};

/// Open the configured job store and apply migrations.
///
/// Falls back to the in-memory store when `PERSISTENCE_URL` is unset. A
/// configured database that cannot be reached is an error, not a fallback.
pub async fn init_store(config: &PersistenceConfig) -> anyhow::Result<Arc<dyn JobStore>> {
    let Some(url) = config.url.as_deref() else {
        warn!("PERSISTENCE_URL not configured, using in-memory job store (jobs are lost on restart)");
        return Ok(Arc::new(MemoryJobStore::new()));
    };

    let store = connect(url, config.max_connections).await?;
    store
        .migrate()
        .await
        .context("failed to run database migrations")?;
    info!("Database migrations applied successfully");
    Ok(Arc::new(store))
}

/// Apply migrations without starting the server.
pub async fn migrate(config: &PersistenceConfig) -> anyhow::Result<()> {
    let url = config
        .url
        .as_deref()
        .context("PERSISTENCE_URL must be set to run migrations")?;
    let store = connect(url, config.max_connections).await?;
    store
        .migrate()
        .await
        .context("failed to run database migrations")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn connect(url: &str, max_connections: u32) -> anyhow::Result<PgJobStore> {
    let store = PgJobStore::connect(url, max_connections)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!(max_connections, "PostgreSQL connected");
    Ok(store)
}
