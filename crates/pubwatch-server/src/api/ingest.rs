//! On-demand scrape and batch trigger routes.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use pubwatch_core::Platform;
use pubwatch_ingest::{IngestError, StoredRecord};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct RecordSummary {
    pub id: i64,
    pub company_name: String,
    pub platform: String,
    pub post_id: String,
    pub url: String,
    pub title: String,
}

impl From<StoredRecord> for RecordSummary {
    fn from(record: StoredRecord) -> Self {
        Self {
            id: record.id,
            company_name: record.company_name,
            platform: record.platform.as_str().to_string(),
            post_id: record.post_id,
            url: record.url,
            title: record.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeData {
    pub company: String,
    pub platform: String,
    pub inserted: usize,
    pub records: Vec<RecordSummary>,
}

/// `POST /api/v1/scrape/{company}/{platform}` — scrape one platform now.
pub(super) async fn scrape_company_platform(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((company, platform_raw)): Path<(String, String)>,
) -> Result<Json<ApiResponse<ScrapeData>>, ApiError> {
    let platform: Platform = platform_raw.parse().map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("unknown platform '{platform_raw}'"),
        )
    })?;

    let records = state
        .ingestor
        .scrape_platform(&company, platform, None)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    let records: Vec<RecordSummary> = records.into_iter().map(RecordSummary::from).collect();
    Ok(Json(ApiResponse {
        data: ScrapeData {
            company,
            platform: platform.as_str().to_string(),
            inserted: records.len(),
            records,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct BatchParams {
    pub max_posts: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct BatchData {
    pub records_inserted: usize,
    pub companies_scraped: usize,
    pub companies_failed: usize,
}

/// `POST /api/v1/batch` — run the full batch immediately.
///
/// Per-company failures are folded into the counters; this route only errors
/// on envelope-level problems.
pub(super) async fn run_batch(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<BatchParams>,
) -> Json<ApiResponse<BatchData>> {
    let outcome = state.scheduler.trigger_now(params.max_posts).await;

    Json(ApiResponse {
        data: BatchData {
            records_inserted: outcome.records.len(),
            companies_scraped: outcome.companies_scraped,
            companies_failed: outcome.companies_failed,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

fn map_ingest_error(request_id: String, error: &IngestError) -> ApiError {
    match error {
        IngestError::CompanyNotFound(name) => ApiError::new(
            request_id,
            "not_found",
            format!("no active company named '{name}'"),
        ),
        IngestError::MissingPlatformLink { company, platform } => ApiError::new(
            request_id,
            "bad_request",
            format!("company '{company}' has no {platform} link configured"),
        ),
        IngestError::Fetch(e) => {
            tracing::warn!(error = %e, "upstream fetch failed");
            ApiError::new(request_id, "bad_gateway", format!("upstream fetch failed: {e}"))
        }
        IngestError::Directory(e) => {
            tracing::error!(error = %e, "company directory lookup failed");
            ApiError::new(request_id, "internal_error", "company lookup failed")
        }
    }
}
