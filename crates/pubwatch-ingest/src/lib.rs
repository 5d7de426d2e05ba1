//! Ingestion orchestration: single scrapes, full batches, and the cron
//! scheduler, all behind storage seams so the dedup and batch semantics are
//! testable without Postgres.

pub mod batch;
pub mod error;
pub mod ingest;
pub mod scheduler;
pub mod store;

#[cfg(test)]
mod testutil;

pub use batch::BatchOutcome;
pub use error::IngestError;
pub use ingest::{IngestOptions, Ingestor};
pub use scheduler::{
    IngestScheduler, JobStatus, SchedulerStatus, CONTENT_FETCH_JOB, MAINTENANCE_JOB,
};
pub use store::{
    Company, CompanyDirectory, ContentStore, PgContentStore, PgDirectory, StoreError, StoredRecord,
};
