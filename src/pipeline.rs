//! The fetch → transform → persist → notify run.
//!
//! Each stage's result is checked before the next one starts. Persisting
//! happens before notifying: a stored row survives a failed push, and nothing
//! is pushed for an observation that was not stored.

use tracing::Instrument;

use crate::error::PipelineError;
use crate::fetch::CwaClient;
use crate::notify::LineNotifier;
use crate::store::ObservationStore;

// ---

pub struct Pipeline<S> {
    fetcher: CwaClient,
    store: S,
    notifier: LineNotifier,
}

impl<S: ObservationStore> Pipeline<S> {
    // ---
    pub fn new(fetcher: CwaClient, store: S, notifier: LineNotifier) -> Self {
        Self {
            fetcher,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run every stage once.
    ///
    /// Returns a human-readable summary containing the observation time.
    /// Any stage error aborts the rest of the run and is returned as-is.
    pub async fn run(&self) -> Result<String, PipelineError> {
        // ---
        let span = tracing::info_span!("pipeline_run", station = %self.fetcher.station_id());
        self.run_stages().instrument(span).await
    }

    async fn run_stages(&self) -> Result<String, PipelineError> {
        // ---
        // Step 1: Fetch
        let raw = self.fetcher.latest().await?;
        tracing::debug!(obs_time = raw.obs_date_time(), "fetched observation");

        // Step 2: Transform
        let obs = raw.normalize()?;
        let obs_time = obs.obs_time_display();
        tracing::debug!(?obs, "normalized observation");

        // Step 3: Persist
        self.store.ensure_schema().await?;
        if self.store.insert_if_absent(&obs).await? {
            tracing::info!(%obs_time, "stored observation");
        } else {
            tracing::info!(%obs_time, "observation already stored, insert skipped");
        }

        // Step 4: Notify
        self.notifier.push(&obs).await?;
        tracing::info!(%obs_time, "notification pushed");

        Ok(format!("stored observation and pushed notification for {obs_time}"))
    }
}
