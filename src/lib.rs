//! Hourly weather collector for a single CWA station.
//!
//! One run fetches the station's latest observation, normalizes it (sentinel
//! readings become absent, feels-like and trend are derived), stores it once
//! per observation minute in Postgres, and pushes a LINE Flex message.
//!
//! Module layout:
//! - `fetch`: CWA open data client
//! - `transform`: raw → normalized observation, pure
//! - `store` / `schema`: idempotent persistence
//! - `message` / `notify`: Flex rendering and LINE push
//! - `pipeline`: the four stages in order
//! - `scheduler`: interval trigger with retry, outside the pipeline
//! - `routes`: health, manual trigger, latest observation

pub mod config;
pub mod error;
pub mod fetch;
pub mod message;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod routes;
pub mod scheduler;
pub mod schema;
pub mod store;
pub mod transform;

pub use config::Config;
pub use error::PipelineError;
pub use models::{NormalizedObservation, RawObservation, Trend};
pub use pipeline::Pipeline;
