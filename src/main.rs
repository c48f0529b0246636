//! Application entry point for the `zhongli-weather` collector.
//!
//! Startup sequence:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Connecting the Postgres observation store
//! - Building the pipeline (CWA fetcher, store, LINE notifier)
//! - Spawning the interval scheduler
//! - Binding the Axum HTTP server for health and manual runs
//!
//! # Environment Variables
//! See `config::load` for the full list. Logging reads `RUST_LOG`,
//! `WEATHER_LOG_LEVEL` (default: `debug`), `WEATHER_SPAN_EVENTS` and
//! `FORCE_COLOR`.
use std::{env, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use reqwest::Client;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use zhongli_weather::fetch::CwaClient;
use zhongli_weather::notify::LineNotifier;
use zhongli_weather::scheduler::{self, RetryPolicy};
use zhongli_weather::store::{ObservationStore, PgStore};
use zhongli_weather::{config, routes, Pipeline};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let http = Client::builder()
        .timeout(cfg.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let store = PgStore::connect(&cfg)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Successfully connected to database");

    // Fail fast on permissions or a bad database before the first tick
    store.ensure_schema().await?;

    let fetcher = CwaClient::new(http.clone(), &cfg.cwa_api_url, &cfg.cwa_api_key, &cfg.station_id)
        .with_context(|| format!("Invalid CWA_API_URL '{}'", cfg.cwa_api_url))?;
    let notifier = LineNotifier::from_config(http, &cfg);
    let pipeline = Arc::new(Pipeline::new(fetcher, store, notifier));

    let policy = RetryPolicy {
        retries: cfg.run_retries,
        delay: cfg.retry_delay,
    };
    let interval = cfg.schedule_interval;
    let scheduled = Arc::clone(&pipeline);
    tokio::spawn(async move { scheduler::run_forever(&scheduled, interval, policy).await });

    let app: Router = routes::router(pipeline);

    tracing::info!("Listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR`:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span events controlled by `WEATHER_SPAN_EVENTS`:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Level from `RUST_LOG` if set, otherwise `WEATHER_LOG_LEVEL`
///
/// Call once at startup, before any tracing macro runs.
fn init_tracing() {
    // ---
    let span_events = match env::var("WEATHER_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("WEATHER_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn,hyper=info,reqwest=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
