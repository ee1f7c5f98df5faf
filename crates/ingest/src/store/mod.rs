//! Full-replace job persistence.
//!
//! A [`JobStore`] holds exactly one ingestion cycle's jobs. `replace_all`
//! swaps the whole set in one step: readers observe either the previous set
//! or the new one, never an empty or partial set. A failed replace leaves the
//! previous set in place.

mod memory;
mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use jobfeed_core::CanonicalJob;

use crate::error::PersistError;

pub use memory::MemoryJobStore;
pub use postgres::PgJobStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Atomically replace every stored job with `jobs`. Returns the number inserted.
    async fn replace_all(&self, jobs: &[CanonicalJob]) -> Result<u64, PersistError>;

    /// Every stored job, in no particular order.
    async fn find_all(&self) -> Result<Vec<CanonicalJob>, PersistError>;

    /// Backend name for health output ("postgres", "memory").
    fn backend(&self) -> &'static str;
}

/// Fail with the first id that appears twice in `jobs`.
pub(crate) fn ensure_unique_ids(jobs: &[CanonicalJob]) -> Result<(), PersistError> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job.id) {
            return Err(PersistError::DuplicateId(job.id));
        }
    }
    Ok(())
}
