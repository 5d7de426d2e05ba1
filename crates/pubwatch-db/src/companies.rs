//! Database operations for the `companies` table.

use chrono::{DateTime, Utc};
use pubwatch_core::Platform;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `companies` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub medium_url: Option<String>,
    pub mirror_url: Option<String>,
    pub paragraph_url: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CompanyRow {
    /// The configured profile link for one platform, if the company has one.
    #[must_use]
    pub fn link_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Medium => self.medium_url.as_deref(),
            Platform::Mirror => self.mirror_url.as_deref(),
            Platform::Paragraph => self.paragraph_url.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active, non-deleted companies, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, DbError> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, public_id, name, slug, medium_url, mirror_url, paragraph_url, \
                notes, is_active, created_at, updated_at, deleted_at \
         FROM companies \
         WHERE is_active = true AND deleted_at IS NULL \
         ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active, non-deleted company by name, or `None` if not found.
///
/// The lookup is case-insensitive so that API callers and config entries do not
/// have to agree on casing.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_company_by_name(pool: &PgPool, name: &str) -> Result<Option<CompanyRow>, DbError> {
    let row = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, public_id, name, slug, medium_url, mirror_url, paragraph_url, \
                notes, is_active, created_at, updated_at, deleted_at \
         FROM companies \
         WHERE LOWER(name) = LOWER($1) AND is_active = true AND deleted_at IS NULL",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Soft-deletes a company by setting `is_active = false` and `deleted_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn deactivate_company(pool: &PgPool, company_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE companies \
         SET is_active = false, deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(company_id)
    .execute(pool)
    .await?;
    Ok(())
}
