use std::path::PathBuf;

use thiserror::Error;

/// The external source could not be read, or returned something other than
/// a non-empty array of records.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source returned HTTP {0}")]
    Status(u16),

    #[error("source body is not valid JSON: {0}")]
    Decode(String),

    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The durable store was unavailable or rejected a write.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate job id {0} in replacement set")]
    DuplicateId(i64),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("persist failed: {0}")]
    Persist(#[from] PersistError),

    #[error("ingestion task aborted: {0}")]
    Aborted(String),
}

impl IngestError {
    /// Short machine-readable kind for logs and status records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Persist(_) => "persist",
            Self::Aborted(_) => "aborted",
        }
    }
}
