//! Database schema management for `zhongli-weather`.
//!
//! Ensures the observation table exists. Called at the start of every run,
//! so it must stay safe to repeat; no-op if the table already exists.

use sqlx::PgPool;

// ---

/// Create the `weather_<location>` table if absent (idempotent).
///
/// `table` must already be a validated identifier (see `config::load`), since
/// DDL cannot take bind parameters.
pub async fn create_schema(pool: &PgPool, table: &str) -> Result<(), sqlx::Error> {
    // ---
    // One row per observation minute; every reading may be NULL
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            obs_time    TIMESTAMP        PRIMARY KEY,
            temp        DOUBLE PRECISION,
            hum         DOUBLE PRECISION,
            wind        DOUBLE PRECISION,
            rain        DOUBLE PRECISION,
            feels_like  DOUBLE PRECISION
        );
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}
