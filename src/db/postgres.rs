use sqlx::{postgres::PgPoolOptions, PgPool};

use super::ReferenceStore;
use crate::error::{AppError, AppResult};
use crate::models::ReferenceRecord;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed reference store.
pub struct PgReferenceStore {
    pool: PgPool,
}

impl PgReferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReferenceStore for PgReferenceStore {
    async fn fetch_candidates(&self) -> AppResult<Vec<ReferenceRecord>> {
        let records = sqlx::query_as::<_, ReferenceRecord>(
            r#"
            SELECT id, name, occupation, birth_date, birth_location,
                   sun_sign_sidereal, sun_sign_tropical,
                   moon_sign_sidereal, moon_sign_tropical,
                   life_path_number, day_number, chinese_zodiac_animal,
                   chart_data, planetary_placements, top_aspects
            FROM reference_people
            WHERE chart_data IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        tracing::debug!(count = records.len(), "Fetched reference candidates");

        Ok(records)
    }
}
