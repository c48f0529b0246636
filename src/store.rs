//! Persistence for normalized observations.
//!
//! [`ObservationStore`] is the seam the pipeline writes through; [`PgStore`]
//! is the Postgres implementation used in production.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::PipelineError;
use crate::models::NormalizedObservation;
use crate::schema;

// ---

/// Durable, `obs_time`-keyed observation storage.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Make sure the backing table exists. Safe to call every run.
    async fn ensure_schema(&self) -> Result<(), PipelineError>;

    /// Insert unless a row with the same `obs_time` exists.
    ///
    /// Returns `true` when a row was written and `false` when the timestamp
    /// was already stored. The existing row is never overwritten.
    async fn insert_if_absent(&self, obs: &NormalizedObservation) -> Result<bool, PipelineError>;

    /// Most recent stored observation, if any.
    async fn latest(&self) -> Result<Option<NormalizedObservation>, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    table: String,
}

impl PgStore {
    // ---
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Open a pool against `DATABASE_URL` and target `weather_<location>`.
    pub async fn connect(cfg: &Config) -> Result<Self, PipelineError> {
        // ---
        let pool = PgPoolOptions::new()
            .max_connections(cfg.db_pool_max)
            .acquire_timeout(cfg.http_timeout)
            .connect(&cfg.db_url)
            .await
            .map_err(|e| persist_error("connect to", e))?;

        Ok(Self::new(pool, cfg.table_name()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ObservationStore for PgStore {
    // ---
    async fn ensure_schema(&self) -> Result<(), PipelineError> {
        schema::create_schema(&self.pool, &self.table)
            .await
            .map_err(|e| persist_error("create schema for", e))
    }

    async fn insert_if_absent(&self, obs: &NormalizedObservation) -> Result<bool, PipelineError> {
        // ---
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (obs_time, temp, hum, wind, rain, feels_like)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (obs_time) DO NOTHING
            "#,
            self.table
        ))
        .bind(obs.obs_time)
        .bind(obs.temp)
        .bind(obs.hum)
        .bind(obs.wind)
        .bind(obs.rain)
        .bind(obs.feels_like)
        .execute(&self.pool)
        .await
        .map_err(|e| persist_error("insert into", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn latest(&self) -> Result<Option<NormalizedObservation>, PipelineError> {
        // ---
        sqlx::query_as::<_, NormalizedObservation>(&format!(
            r#"
            SELECT obs_time, temp, hum, wind, rain, feels_like
            FROM {}
            ORDER BY obs_time DESC
            LIMIT 1
            "#,
            self.table
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persist_error("read from", e))
    }
}

fn persist_error(action: &'static str, source: sqlx::Error) -> PipelineError {
    tracing::debug!(action, error = %source, "observation store call failed");
    PipelineError::Persist { action, source }
}
