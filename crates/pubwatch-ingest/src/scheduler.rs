//! Recurring ingestion driven by `tokio-cron-scheduler`.
//!
//! The scheduler owns two named jobs: the content fetch (full batch on the
//! configured cron) and a daily maintenance pass. Job identity lives in the
//! underlying [`JobScheduler`]; `status()` asks it for the next tick instead
//! of tracking a flag of its own.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::ingest::Ingestor;
use crate::store::{CompanyDirectory, ContentStore};

pub const CONTENT_FETCH_JOB: &str = "content-fetch";
pub const MAINTENANCE_JOB: &str = "maintenance";

/// Point-in-time view of one registered job.
#[derive(Debug, Clone)]
pub struct JobStatus {
    pub name: &'static str,
    pub scheduled: bool,
    pub next_tick: Option<DateTime<Utc>>,
}

/// Point-in-time view of the whole scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerStatus {
    pub running: bool,
    pub jobs: Vec<JobStatus>,
}

struct SchedulerState {
    scheduler: Option<JobScheduler>,
    jobs: HashMap<&'static str, Uuid>,
}

pub struct IngestScheduler<D, S> {
    ingestor: Arc<Ingestor<D, S>>,
    /// When present, scheduled batches are recorded in `ingest_runs`.
    pool: Option<PgPool>,
    fetch_cron: String,
    maintenance_cron: String,
    state: Mutex<SchedulerState>,
}

impl<D, S> IngestScheduler<D, S>
where
    D: CompanyDirectory + 'static,
    S: ContentStore + 'static,
{
    pub fn new(
        ingestor: Arc<Ingestor<D, S>>,
        pool: Option<PgPool>,
        fetch_cron: String,
        maintenance_cron: String,
    ) -> Self {
        Self {
            ingestor,
            pool,
            fetch_cron,
            maintenance_cron,
            state: Mutex::new(SchedulerState {
                scheduler: None,
                jobs: HashMap::new(),
            }),
        }
    }

    /// Starts the scheduler and registers both jobs. Calling this while the
    /// scheduler is already running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`JobSchedulerError`] if a cron expression is invalid or the
    /// scheduler cannot start.
    pub async fn initialize(&self) -> Result<(), JobSchedulerError> {
        let mut state = self.state.lock().await;
        if state.scheduler.is_some() {
            tracing::debug!("scheduler already initialized, skipping");
            return Ok(());
        }

        let scheduler = JobScheduler::new().await?;

        let fetch_id = scheduler.add(self.content_fetch_job()?).await?;
        let maintenance_id = scheduler.add(self.maintenance_job()?).await?;

        scheduler.start().await?;

        state.jobs.insert(CONTENT_FETCH_JOB, fetch_id);
        state.jobs.insert(MAINTENANCE_JOB, maintenance_id);
        state.scheduler = Some(scheduler);

        tracing::info!(
            fetch_cron = %self.fetch_cron,
            maintenance_cron = %self.maintenance_cron,
            "scheduler initialized"
        );
        Ok(())
    }

    /// Shuts the scheduler down and clears the job registry. A stopped
    /// scheduler can be brought back with [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns [`JobSchedulerError`] if shutdown fails.
    pub async fn stop_all(&self) -> Result<(), JobSchedulerError> {
        let mut state = self.state.lock().await;
        if let Some(mut scheduler) = state.scheduler.take() {
            scheduler.shutdown().await?;
            tracing::info!("scheduler stopped");
        }
        state.jobs.clear();
        Ok(())
    }

    /// Stop followed by a fresh initialize.
    ///
    /// # Errors
    ///
    /// Returns [`JobSchedulerError`] if either phase fails.
    pub async fn restart_all(&self) -> Result<(), JobSchedulerError> {
        self.stop_all().await?;
        self.initialize().await
    }

    /// Reports per-job scheduled-ness from the underlying scheduler's next
    /// planned tick.
    pub async fn status(&self) -> SchedulerStatus {
        let mut state = self.state.lock().await;
        let running = state.scheduler.is_some();

        let mut jobs = Vec::with_capacity(2);
        for name in [CONTENT_FETCH_JOB, MAINTENANCE_JOB] {
            let id = state.jobs.get(name).copied();
            let next_tick = match (state.scheduler.as_mut(), id) {
                (Some(scheduler), Some(id)) => {
                    scheduler.next_tick_for_job(id).await.unwrap_or(None)
                }
                _ => None,
            };
            jobs.push(JobStatus {
                name,
                scheduled: next_tick.is_some(),
                next_tick,
            });
        }

        SchedulerStatus { running, jobs }
    }

    /// Runs a full batch immediately, outside the cron cadence. Safe to
    /// overlap with a scheduled firing; the store-level dedup absorbs the
    /// double pass.
    pub async fn trigger_now(&self, max_posts: Option<usize>) -> crate::batch::BatchOutcome {
        match &self.pool {
            Some(pool) => {
                self.ingestor
                    .run_all_recorded(pool, "manual", max_posts)
                    .await
            }
            None => self.ingestor.run_all(max_posts).await,
        }
    }

    fn content_fetch_job(&self) -> Result<Job, JobSchedulerError> {
        let ingestor = Arc::clone(&self.ingestor);
        let pool = self.pool.clone();

        Job::new_async(self.fetch_cron.as_str(), move |_uuid, _lock| {
            let ingestor = Arc::clone(&ingestor);
            let pool = pool.clone();

            Box::pin(async move {
                tracing::info!("scheduler: starting content fetch run");
                let outcome = match &pool {
                    Some(pool) => ingestor.run_all_recorded(pool, "schedule", None).await,
                    None => ingestor.run_all(None).await,
                };
                tracing::info!(
                    inserted = outcome.records.len(),
                    scraped = outcome.companies_scraped,
                    failed = outcome.companies_failed,
                    "scheduler: content fetch run complete"
                );
            })
        })
    }

    fn maintenance_job(&self) -> Result<Job, JobSchedulerError> {
        Job::new_async(self.maintenance_cron.as_str(), move |_uuid, _lock| {
            Box::pin(async move {
                // Placeholder cadence for future pruning of stale records.
                tracing::info!("scheduler: maintenance pass (nothing to prune)");
            })
        })
    }
}
