use std::time::Duration;

use async_trait::async_trait;
use jobfeed_core::CanonicalJob;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, error};

use super::{ensure_unique_ids, JobStore};
use crate::error::PersistError;

/// Row from the `jobs` table.
#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    title: String,
    company: String,
    location: String,
    description: String,
    apply_link: String,
    salary: String,
}

impl From<JobRow> for CanonicalJob {
    fn from(row: JobRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            description: row.description,
            apply_link: row.apply_link,
            salary: row.salary,
        }
    }
}

/// PostgreSQL-backed store. `replace_all` runs DELETE + bulk INSERT in a
/// single transaction, so concurrent readers keep seeing the previous set
/// until commit.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect eagerly so a bad `PERSISTENCE_URL` fails at startup.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, PersistError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending migrations from the workspace `migrations/` directory.
    pub async fn migrate(&self) -> Result<(), PersistError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PersistError::Database(e.into()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn replace_all(&self, jobs: &[CanonicalJob]) -> Result<u64, PersistError> {
        // Reject duplicates before touching the table; the primary key would
        // fail the insert anyway, but without telling us which id.
        ensure_unique_ids(jobs)?;

        let mut ids = Vec::with_capacity(jobs.len());
        let mut titles = Vec::with_capacity(jobs.len());
        let mut companies = Vec::with_capacity(jobs.len());
        let mut locations = Vec::with_capacity(jobs.len());
        let mut descriptions = Vec::with_capacity(jobs.len());
        let mut links = Vec::with_capacity(jobs.len());
        let mut salaries = Vec::with_capacity(jobs.len());
        for job in jobs {
            ids.push(job.id);
            titles.push(job.title.clone());
            companies.push(job.company.clone());
            locations.push(job.location.clone());
            descriptions.push(job.description.clone());
            links.push(job.apply_link.clone());
            salaries.push(job.salary.clone());
        }

        // Dropping `tx` on any early return rolls back.
        let mut tx = self.pool.begin().await.map_err(log_db_error)?;

        let deleted = sqlx::query("DELETE FROM jobs")
            .execute(&mut *tx)
            .await
            .map_err(log_db_error)?
            .rows_affected();

        let inserted = sqlx::query(
            "INSERT INTO jobs (id, title, company, location, description, apply_link, salary)
             SELECT * FROM UNNEST($1::bigint[], $2::text[], $3::text[], $4::text[],
                                  $5::text[], $6::text[], $7::text[])",
        )
        .bind(&ids)
        .bind(&titles)
        .bind(&companies)
        .bind(&locations)
        .bind(&descriptions)
        .bind(&links)
        .bind(&salaries)
        .execute(&mut *tx)
        .await
        .map_err(log_db_error)?
        .rows_affected();

        tx.commit().await.map_err(log_db_error)?;

        debug!(deleted, inserted, "jobs table replaced");
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<CanonicalJob>, PersistError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT id, title, company, location, description, apply_link, salary
             FROM jobs",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(log_db_error)?;

        Ok(rows.into_iter().map(CanonicalJob::from).collect())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

fn log_db_error(e: sqlx::Error) -> PersistError {
    error!("job store database error: {}", e);
    PersistError::Database(e)
}
