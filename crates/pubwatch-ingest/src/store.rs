//! Storage seams for the ingestion pipeline.
//!
//! The orchestrators depend on these traits rather than on `PgPool` directly,
//! so batch and dedup behaviour is testable against in-memory fakes. The
//! Postgres adapters at the bottom are thin maps over `pubwatch-db`.

use async_trait::async_trait;
use pubwatch_core::{NormalizedPost, Platform};
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content record already exists for post {post_id}")]
    Duplicate { post_id: String },
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A company as the ingestion layer sees it: name, slug, and platform links.
#[derive(Debug, Clone)]
pub struct Company {
    pub name: String,
    pub slug: String,
    pub medium_url: Option<String>,
    pub mirror_url: Option<String>,
    pub paragraph_url: Option<String>,
}

impl Company {
    /// The configured profile link for a platform, if any.
    #[must_use]
    pub fn link_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Medium => self.medium_url.as_deref(),
            Platform::Mirror => self.mirror_url.as_deref(),
            Platform::Paragraph => self.paragraph_url.as_deref(),
        }
    }

    /// Platforms this company has a link for, in declaration order.
    #[must_use]
    pub fn linked_platforms(&self) -> Vec<Platform> {
        pubwatch_core::ALL_PLATFORMS
            .iter()
            .copied()
            .filter(|p| self.link_for(*p).is_some())
            .collect()
    }
}

/// The slice of a persisted content record the orchestrators report back.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: i64,
    pub company_name: String,
    pub platform: Platform,
    pub post_id: String,
    pub url: String,
    pub title: String,
}

/// Read access to the set of monitored companies.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Company>, StoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError>;
}

/// Persistence for scraped posts.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// True if a record with this `post_id` OR this `url` is already stored.
    async fn exists(&self, post_id: &str, url: &str) -> Result<bool, StoreError>;
    async fn insert(
        &self,
        company_name: &str,
        post: &NormalizedPost,
    ) -> Result<StoredRecord, StoreError>;
    async fn mark_processed(&self, id: i64) -> Result<(), StoreError>;
    async fn mark_processed_bulk(&self, ids: &[i64]) -> Result<u64, StoreError>;
}

// ---------------------------------------------------------------------------
// Postgres adapters
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn company_from_row(row: pubwatch_db::CompanyRow) -> Company {
    Company {
        name: row.name,
        slug: row.slug,
        medium_url: row.medium_url,
        mirror_url: row.mirror_url,
        paragraph_url: row.paragraph_url,
    }
}

#[async_trait]
impl CompanyDirectory for PgDirectory {
    async fn list_active(&self) -> Result<Vec<Company>, StoreError> {
        let rows = pubwatch_db::list_active_companies(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(rows.into_iter().map(company_from_row).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        let row = pubwatch_db::get_company_by_name(&self.pool, name)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(row.map(company_from_row))
    }
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: pubwatch_db::DbError) -> StoreError {
    match e {
        pubwatch_db::DbError::Duplicate { post_id } => StoreError::Duplicate { post_id },
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn exists(&self, post_id: &str, url: &str) -> Result<bool, StoreError> {
        pubwatch_db::content_exists(&self.pool, post_id, url)
            .await
            .map_err(map_db_error)
    }

    async fn insert(
        &self,
        company_name: &str,
        post: &NormalizedPost,
    ) -> Result<StoredRecord, StoreError> {
        let row = pubwatch_db::insert_content_record(&self.pool, company_name, post)
            .await
            .map_err(map_db_error)?;
        Ok(StoredRecord {
            id: row.id,
            company_name: row.company_name,
            platform: post.platform,
            post_id: row.post_id,
            url: row.url,
            title: row.title,
        })
    }

    async fn mark_processed(&self, id: i64) -> Result<(), StoreError> {
        pubwatch_db::mark_processed(&self.pool, id)
            .await
            .map_err(map_db_error)
    }

    async fn mark_processed_bulk(&self, ids: &[i64]) -> Result<u64, StoreError> {
        pubwatch_db::mark_processed_bulk(&self.pool, ids)
            .await
            .map_err(map_db_error)
    }
}
