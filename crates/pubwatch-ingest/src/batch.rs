//! Batch orchestration across all active companies.

use sqlx::PgPool;
use tokio::time::sleep;

use crate::ingest::Ingestor;
use crate::store::{CompanyDirectory, ContentStore, StoredRecord};

/// Summary of one batch run. The batch never errors; failures are folded
/// into `companies_failed`.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<StoredRecord>,
    pub companies_scraped: usize,
    pub companies_failed: usize,
}

impl BatchOutcome {
    #[must_use]
    pub fn records_inserted(&self) -> usize {
        self.records.len()
    }
}

impl<D, S> Ingestor<D, S>
where
    D: CompanyDirectory,
    S: ContentStore,
{
    /// Scrapes every linked platform of every active company, in listing
    /// order, sleeping the configured delay between companies.
    ///
    /// One company failing (fetch error, dead link) is counted and logged;
    /// the rest of the batch proceeds. A directory failure yields an empty
    /// outcome rather than an error, so scheduled firings can never wedge
    /// on a transient listing problem.
    pub async fn run_all(&self, max_posts: Option<usize>) -> BatchOutcome {
        let companies = match self.directory().list_active().await {
            Ok(companies) => companies,
            Err(e) => {
                tracing::error!(error = %e, "failed to list companies, skipping batch");
                return BatchOutcome::default();
            }
        };

        tracing::info!(companies = companies.len(), "starting batch run");

        let mut outcome = BatchOutcome::default();
        let delay = self.options().inter_company_delay;
        let last = companies.len().saturating_sub(1);

        for (idx, company) in companies.iter().enumerate() {
            let mut company_failed = false;

            for platform in company.linked_platforms() {
                match self.scrape_platform(&company.name, platform, max_posts).await {
                    Ok(mut records) => {
                        tracing::info!(
                            company = %company.slug,
                            platform = %platform,
                            inserted = records.len(),
                            "platform scrape complete"
                        );
                        outcome.records.append(&mut records);
                    }
                    Err(e) => {
                        tracing::warn!(
                            company = %company.slug,
                            platform = %platform,
                            error = %e,
                            "platform scrape failed, continuing batch"
                        );
                        company_failed = true;
                    }
                }
            }

            if company_failed {
                outcome.companies_failed += 1;
            } else {
                outcome.companies_scraped += 1;
            }

            // Rate-limit courtesy toward the platforms; no sleep after the
            // final company.
            if idx < last && !delay.is_zero() {
                sleep(delay).await;
            }
        }

        tracing::info!(
            inserted = outcome.records.len(),
            scraped = outcome.companies_scraped,
            failed = outcome.companies_failed,
            "batch run complete"
        );

        outcome
    }

    /// Runs a batch wrapped in an `ingest_runs` bookkeeping row.
    ///
    /// Bookkeeping failures are logged and never affect the batch itself.
    pub async fn run_all_recorded(
        &self,
        pool: &PgPool,
        trigger_source: &str,
        max_posts: Option<usize>,
    ) -> BatchOutcome {
        let run = match pubwatch_db::create_ingest_run(pool, trigger_source).await {
            Ok(run) => Some(run),
            Err(e) => {
                tracing::warn!(error = %e, "could not create ingest run row, batch proceeds unrecorded");
                None
            }
        };

        if let Some(run) = &run {
            if let Err(e) = pubwatch_db::start_ingest_run(pool, run.id).await {
                tracing::warn!(run_id = run.id, error = %e, "could not start ingest run row");
            }
        }

        let outcome = self.run_all(max_posts).await;

        if let Some(run) = &run {
            let total = outcome.companies_scraped + outcome.companies_failed;
            let result = pubwatch_db::complete_ingest_run(
                pool,
                run.id,
                clamp_i32(outcome.records.len()),
                clamp_i32(total),
                clamp_i32(outcome.companies_failed),
            )
            .await;
            if let Err(e) = result {
                tracing::warn!(run_id = run.id, error = %e, "could not complete ingest run row");
            }
        }

        outcome
    }
}

fn clamp_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
