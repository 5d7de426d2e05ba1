//! Database operations for the `content_records` table.

use chrono::{DateTime, Utc};
use pubwatch_core::NormalizedPost;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `content_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRecordRow {
    pub id: i64,
    pub company_name: String,
    pub platform: String,
    pub post_id: String,
    pub url: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub author_name: String,
    pub author_username: Option<String>,
    pub author_profile_url: Option<String>,
    pub author_avatar_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub claps: i64,
    pub views: i64,
    pub comments: i64,
    pub shares: i64,
    pub featured_image: Option<String>,
    pub reading_time_minutes: Option<i32>,
    pub processed: bool,
    pub fetched_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, company_name, platform, post_id, url, title, content, excerpt, \
     author_name, author_username, author_profile_url, author_avatar_url, published_at, \
     tags, claps, views, comments, shares, featured_image, reading_time_minutes, \
     processed, fetched_at, processed_at, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns `true` if a record with the given `post_id` OR the given `url`
/// already exists.
///
/// Matching on either key means a post survives URL churn (same id, tweaked
/// query) as well as id churn (same url, changed derivation input).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn content_exists(pool: &PgPool, post_id: &str, url: &str) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM content_records WHERE post_id = $1 OR url = $2)",
    )
    .bind(post_id)
    .bind(url)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Inserts a scraped post as a new content record and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Duplicate`] if the `post_id` or `url` unique constraint
/// fires (a concurrent writer beat us to it), or [`DbError::Sqlx`] for any
/// other failure.
pub async fn insert_content_record(
    pool: &PgPool,
    company_name: &str,
    post: &NormalizedPost,
) -> Result<ContentRecordRow, DbError> {
    let claps = clamp_count(post.metrics.claps);
    let views = clamp_count(post.metrics.views);
    let comments = clamp_count(post.metrics.comments);
    let shares = clamp_count(post.metrics.shares);
    let reading_time = post
        .reading_time_minutes
        .map(|m| i32::try_from(m).unwrap_or(i32::MAX));

    let result = sqlx::query_as::<_, ContentRecordRow>(&format!(
        "INSERT INTO content_records \
           (company_name, platform, post_id, url, title, content, excerpt, \
            author_name, author_username, author_profile_url, author_avatar_url, \
            published_at, tags, claps, views, comments, shares, \
            featured_image, reading_time_minutes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
         RETURNING {COLUMNS}"
    ))
    .bind(company_name)
    .bind(post.platform.as_str())
    .bind(&post.post_id)
    .bind(&post.url)
    .bind(&post.title)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(&post.author.name)
    .bind(&post.author.username)
    .bind(&post.author.profile_url)
    .bind(&post.author.avatar_url)
    .bind(post.published_at)
    .bind(&post.tags)
    .bind(claps)
    .bind(views)
    .bind(comments)
    .bind(shares)
    .bind(&post.featured_image)
    .bind(reading_time)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DbError::Duplicate {
                post_id: post.post_id.clone(),
            })
        }
        Err(e) => Err(DbError::from(e)),
    }
}

/// Marks a single record as processed.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn mark_processed(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_records \
         SET processed = true, processed_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Marks a batch of records as processed. Returns the number of rows updated;
/// ids that do not exist are silently skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_processed_bulk(pool: &PgPool, ids: &[i64]) -> Result<u64, DbError> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "UPDATE content_records \
         SET processed = true, processed_at = NOW() \
         WHERE id = ANY($1)",
    )
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns the most recent records, newest publication first, optionally
/// filtered by company and/or platform.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_content_records(
    pool: &PgPool,
    company_name: Option<&str>,
    platform: Option<&str>,
    limit: i64,
) -> Result<Vec<ContentRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, ContentRecordRow>(&format!(
        "SELECT {COLUMNS} \
         FROM content_records \
         WHERE ($1::TEXT IS NULL OR company_name = $1) \
           AND ($2::TEXT IS NULL OR platform = $2) \
         ORDER BY published_at DESC, id DESC \
         LIMIT $3"
    ))
    .bind(company_name)
    .bind(platform)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn clamp_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
