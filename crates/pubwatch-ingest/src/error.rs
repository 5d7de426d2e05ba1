use pubwatch_core::Platform;
use pubwatch_scraper::ScrapeError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the on-demand scrape path.
///
/// The batch path catches these per company; only single-scrape callers
/// (API, CLI) see them directly.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("company not found or inactive: {0}")]
    CompanyNotFound(String),

    #[error("company '{company}' has no {platform} link configured")]
    MissingPlatformLink { company: String, platform: Platform },

    #[error(transparent)]
    Fetch(#[from] ScrapeError),

    #[error("company directory lookup failed: {0}")]
    Directory(#[source] StoreError),
}
