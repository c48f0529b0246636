use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::{debug, error};

use crate::pipeline::Pipeline;
use crate::store::ObservationStore;

// ---

pub fn router<S>() -> Router<Arc<Pipeline<S>>>
where
    S: ObservationStore + 'static,
{
    // ---
    Router::new().route("/observations/latest", get(handler::<S>))
}

/// Handle `GET /observations/latest`: the newest stored row, or 404.
async fn handler<S>(State(pipeline): State<Arc<Pipeline<S>>>) -> impl IntoResponse
where
    S: ObservationStore + 'static,
{
    // ---
    match pipeline.store().latest().await {
        Ok(Some(obs)) => {
            debug!(obs_time = %obs.obs_time_display(), "GET /observations/latest - found");
            (StatusCode::OK, Json(obs)).into_response()
        }
        Ok(None) => (StatusCode::NOT_FOUND, Json("No observations stored yet")).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read latest observation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Failed to read observations"),
            )
                .into_response()
        }
    }
}
