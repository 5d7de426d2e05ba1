//! Read access to stored content records.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use pubwatch_db::ContentRecordRow;
use serde::{Deserialize, Serialize};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ContentParams {
    pub company: Option<String>,
    pub platform: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ContentItem {
    pub id: i64,
    pub company_name: String,
    pub platform: String,
    pub post_id: String,
    pub url: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub author_name: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub claps: i64,
    pub comments: i64,
    pub processed: bool,
    pub fetched_at: DateTime<Utc>,
}

impl From<ContentRecordRow> for ContentItem {
    fn from(row: ContentRecordRow) -> Self {
        Self {
            id: row.id,
            company_name: row.company_name,
            platform: row.platform,
            post_id: row.post_id,
            url: row.url,
            title: row.title,
            excerpt: row.excerpt,
            author_name: row.author_name,
            published_at: row.published_at,
            tags: row.tags,
            claps: row.claps,
            comments: row.comments,
            processed: row.processed,
            fetched_at: row.fetched_at,
        }
    }
}

/// `GET /api/v1/content` — recent records, newest publication first.
pub(super) async fn list_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ContentParams>,
) -> Result<Json<ApiResponse<Vec<ContentItem>>>, ApiError> {
    let rows = pubwatch_db::list_content_records(
        &state.pool,
        params.company.as_deref(),
        params.platform.as_deref(),
        normalize_limit(params.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ContentItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
