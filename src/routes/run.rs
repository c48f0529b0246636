use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;
use tracing::{error, info};

use crate::pipeline::Pipeline;
use crate::store::ObservationStore;

// ---

/// JSON body returned by `POST /run`.
#[derive(Debug, Serialize)]
struct RunResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<&'static str>,
    message: String,
}

pub fn router<S>() -> Router<Arc<Pipeline<S>>>
where
    S: ObservationStore + 'static,
{
    // ---
    Router::new().route("/run", post(handler::<S>))
}

/// Handle `POST /run`: one pipeline run, outside the schedule.
///
/// No retries here; a failed stage is reported as 502 with the stage name.
async fn handler<S>(State(pipeline): State<Arc<Pipeline<S>>>) -> impl IntoResponse
where
    S: ObservationStore + 'static,
{
    // ---
    info!("POST /run - manual trigger");

    match pipeline.run().await {
        Ok(message) => (
            StatusCode::OK,
            Json(RunResponse {
                ok: true,
                stage: None,
                message,
            }),
        ),
        Err(e) => {
            error!(stage = e.stage(), error = %e, "manual run failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(RunResponse {
                    ok: false,
                    stage: Some(e.stage()),
                    message: e.to_string(),
                }),
            )
        }
    }
}
