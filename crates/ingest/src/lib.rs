//! Job ingestion pipeline.
//!
//! - [`normalize`]: raw external record → [`JobCandidate`]
//! - [`filter`]: mandatory-field check under a [`ValidationPolicy`]
//! - [`source`]: where raw payloads come from ([`JobSource`])
//! - [`store`]: full-replace persistence ([`JobStore`])
//! - [`pipeline`]: one fetch → normalize → filter → replace run ([`IngestionJob`])
//! - [`runner`]: single-flight wrapper shared by the scheduler and the API ([`IngestRunner`])
//!
//! [`ValidationPolicy`]: jobfeed_core::ValidationPolicy

pub mod error;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod raw;
pub mod runner;
pub mod sanitize;
pub mod source;
pub mod store;

pub use error::{FetchError, IngestError, PersistError};
pub use normalize::{normalize, JobCandidate};
pub use pipeline::{IngestOutcome, IngestReport, IngestionJob};
pub use runner::{IngestRunner, RunRecord, RunResult, RunStatus, TriggerKind};
pub use source::{FileJobSource, HttpJobSource, JobSource};
pub use store::{JobStore, MemoryJobStore, PgJobStore};
