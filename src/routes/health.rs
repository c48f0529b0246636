// src/routes/health.rs
//! Liveness endpoint for the collector.
//!
//! `GET /health` answers as long as the HTTP surface is up. It does not touch
//! the database, the CWA API or LINE, so a failing upstream never makes the
//! process look dead to a supervisor.

use axum::{routing::get, Json, Router};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Subrouter with the single `GET /health` route.
///
/// Generic over the gateway state so it merges with any `Router<S>`.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
