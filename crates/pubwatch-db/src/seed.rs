use pubwatch_core::CompanyConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert companies from config into the database.
///
/// Returns the number of companies processed (inserted or updated).
/// All upserts run inside a single transaction; if any operation fails
/// the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_companies(pool: &PgPool, companies: &[CompanyConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for company in companies {
        let slug = company.slug();

        sqlx::query(
            "INSERT INTO companies (name, slug, medium_url, mirror_url, paragraph_url, notes, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, true) \
             ON CONFLICT (slug) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 medium_url = EXCLUDED.medium_url, \
                 mirror_url = EXCLUDED.mirror_url, \
                 paragraph_url = EXCLUDED.paragraph_url, \
                 notes = EXCLUDED.notes, \
                 is_active = true, \
                 deleted_at = NULL, \
                 updated_at = NOW()",
        )
        .bind(&company.name)
        .bind(&slug)
        .bind(&company.medium_url)
        .bind(&company.mirror_url)
        .bind(&company.paragraph_url)
        .bind(&company.notes)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
