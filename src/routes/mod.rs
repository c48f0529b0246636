//! Routes gateway: merges every subrouter and attaches the shared pipeline.
use std::sync::Arc;

use axum::Router;

use crate::pipeline::Pipeline;
use crate::store::ObservationStore;

mod health;
mod observations;
mod run;

// ---

pub fn router<S>(pipeline: Arc<Pipeline<S>>) -> Router
where
    S: ObservationStore + 'static,
{
    // ---
    Router::new()
        .merge(run::router::<S>())
        .merge(observations::router::<S>())
        .merge(health::router())
        .with_state(pipeline)
}
