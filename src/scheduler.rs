//! Fixed-interval trigger with a fixed retry policy around each run.
//!
//! This is the outer clock: the pipeline itself never retries.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::store::ObservationStore;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Re-attempts after the first failure.
    pub retries: u32,
    pub delay: Duration,
}

/// Call `attempt` until it succeeds or the policy is exhausted.
///
/// The last error is returned when every attempt failed.
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, mut attempt: F) -> Result<T, PipelineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    // ---
    let mut tries = 0;
    loop {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) if tries < policy.retries => {
                tries += 1;
                tracing::warn!(
                    stage = e.stage(),
                    error = %e,
                    retry = tries,
                    of = policy.retries,
                    "run failed, retrying in {:?}",
                    policy.delay
                );
                time::sleep(policy.delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run the pipeline every `interval`, forever.
///
/// The first run starts immediately. A tick that comes due while a run is
/// still retrying is delayed rather than queued.
pub async fn run_forever<S: ObservationStore>(
    pipeline: &Pipeline<S>,
    interval: Duration,
    policy: RetryPolicy,
) {
    // ---
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval_secs = interval.as_secs(), retries = policy.retries, "scheduler started");

    loop {
        ticker.tick().await;

        match with_retries(policy, || pipeline.run()).await {
            Ok(summary) => tracing::info!("{}", summary),
            Err(e) => tracing::error!(stage = e.stage(), error = %e, "run failed after all retries"),
        }
    }
}
