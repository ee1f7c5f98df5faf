use std::sync::Arc;

use async_trait::async_trait;
use jobfeed_core::CanonicalJob;
use tokio::sync::RwLock;

use super::{ensure_unique_ids, JobStore};
use crate::error::PersistError;

/// In-process store, used when no database is configured.
///
/// The replacement set is built and checked before the write lock is
/// taken, so the swap itself cannot fail.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Arc<Vec<CanonicalJob>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn replace_all(&self, jobs: &[CanonicalJob]) -> Result<u64, PersistError> {
        ensure_unique_ids(jobs)?;

        let next = Arc::new(jobs.to_vec());
        *self.jobs.write().await = next;
        Ok(jobs.len() as u64)
    }

    async fn find_all(&self) -> Result<Vec<CanonicalJob>, PersistError> {
        let snapshot = self.jobs.read().await.clone();
        Ok(snapshot.as_ref().clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
