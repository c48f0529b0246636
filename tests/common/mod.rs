//! Shared fakes for integration tests: an in-memory store and local HTTP
//! servers standing in for the CWA API and the LINE push endpoint.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDateTime;
use reqwest::Client;
use serde_json::{json, Value};

use zhongli_weather::fetch::CwaClient;
use zhongli_weather::notify::LineNotifier;
use zhongli_weather::store::ObservationStore;
use zhongli_weather::{NormalizedObservation, Pipeline, PipelineError};

// ---

pub const STATION_ID: &str = "C0C700";
pub const API_KEY: &str = "CWA-TEST-KEY";
pub const LINE_TOKEN: &str = "test-token";
pub const LINE_USER: &str = "U-test";

/// Spawn `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    // ---
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// ---

/// `ObservationStore` backed by a map, with call counters.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<NaiveDateTime, NormalizedObservation>>,
    pub schema_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
    fail: bool,
}

impl MemoryStore {
    // ---
    /// A store whose every call fails like an unreachable database.
    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<NormalizedObservation> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    fn check(&self, action: &'static str) -> Result<(), PipelineError> {
        if self.fail {
            return Err(PipelineError::Persist {
                action,
                source: sqlx::Error::PoolTimedOut,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    // ---
    async fn ensure_schema(&self) -> Result<(), PipelineError> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        self.check("create schema for")
    }

    async fn insert_if_absent(&self, obs: &NormalizedObservation) -> Result<bool, PipelineError> {
        // ---
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check("insert into")?;

        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&obs.obs_time) {
            return Ok(false);
        }
        rows.insert(obs.obs_time, obs.clone());
        Ok(true)
    }

    async fn latest(&self) -> Result<Option<NormalizedObservation>, PipelineError> {
        self.check("read from")?;
        Ok(self.rows.lock().unwrap().values().next_back().cloned())
    }
}

// ---

/// What the fake CWA endpoint saw and what it answers with.
pub struct FakeCwa {
    pub url: String,
    pub requests: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

#[derive(Clone)]
struct CwaState {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

async fn cwa_handler(
    State(state): State<CwaState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(params);
    (state.status, Json(state.body.clone()))
}

pub async fn fake_cwa(status: StatusCode, body: Value) -> FakeCwa {
    // ---
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = CwaState {
        status,
        body,
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/api/v1/rest/datastore/O-A0001-001", get(cwa_handler))
        .with_state(state);

    FakeCwa {
        url: serve(app).await,
        requests,
    }
}

/// A CWA response with a single station record.
pub fn station_response(date_time: &str, weather: Value) -> Value {
    // ---
    json!({
        "success": "true",
        "records": {
            "Station": [{
                "StationName": "中壢",
                "StationId": STATION_ID,
                "ObsTime": { "DateTime": date_time },
                "WeatherElement": weather
            }]
        }
    })
}

pub fn empty_response() -> Value {
    json!({ "success": "true", "records": { "Station": [] } })
}

// ---

/// One request received by the fake LINE endpoint.
#[derive(Debug, Clone)]
pub struct Push {
    pub authorization: Option<String>,
    pub body: Value,
}

pub struct FakeLine {
    pub url: String,
    pub pushes: Arc<Mutex<Vec<Push>>>,
}

impl FakeLine {
    pub fn pushes(&self) -> Vec<Push> {
        self.pushes.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct LineState {
    status: StatusCode,
    pushes: Arc<Mutex<Vec<Push>>>,
}

async fn line_handler(State(state): State<LineState>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
    // ---
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state.pushes.lock().unwrap().push(Push { authorization, body });
    state.status
}

pub async fn fake_line(status: StatusCode) -> FakeLine {
    // ---
    let pushes = Arc::new(Mutex::new(Vec::new()));
    let state = LineState {
        status,
        pushes: Arc::clone(&pushes),
    };
    let app = Router::new()
        .route("/v2/bot/message/push", post(line_handler))
        .with_state(state);

    FakeLine {
        url: serve(app).await,
        pushes,
    }
}

// ---

pub fn http_client() -> Client {
    Client::builder().timeout(Duration::from_secs(5)).build().unwrap()
}

pub fn pipeline<S: ObservationStore>(cwa: &FakeCwa, line: &FakeLine, store: S) -> Pipeline<S> {
    // ---
    let http = http_client();
    let fetcher = CwaClient::new(http.clone(), &cwa.url, API_KEY, STATION_ID).unwrap();
    let notifier = LineNotifier::new(http, &line.url, LINE_TOKEN, LINE_USER, "中壢");
    Pipeline::new(fetcher, store, notifier)
}
