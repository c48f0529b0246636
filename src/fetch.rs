//! Client for the CWA open data "current observation" dataset.

use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

use crate::error::PipelineError;
use crate::models::{CwaResponse, RawObservation};

// ---

const OBSERVATION_DATASET: &str = "O-A0001-001";

#[derive(Debug, Clone)]
pub struct CwaClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    station_id: String,
}

impl CwaClient {
    // ---
    /// Build a client for one station. Fails only if `base_url` is not a URL.
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
        station_id: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        // ---
        let base = Url::parse(base_url)?;
        let endpoint = base.join(&format!("api/v1/rest/datastore/{OBSERVATION_DATASET}"))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            station_id: station_id.into(),
        })
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Fetch the most recent observation for the configured station.
    ///
    /// A successful response without a record for the station is
    /// [`PipelineError::NoData`], not a transport failure.
    pub async fn latest(&self) -> Result<RawObservation, PipelineError> {
        // ---
        tracing::debug!(
            endpoint = %self.endpoint,
            station = %self.station_id,
            "requesting latest observation"
        );

        let resp: CwaResponse = self
            .client
            .get(self.request_url())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.fetch_error(e))?
            .json()
            .await
            .map_err(|e| self.fetch_error(e))?;

        tracing::debug!(records = resp.records.station.len(), "observation response decoded");

        resp.records
            .station
            .into_iter()
            .find(|s| s.station_id == self.station_id)
            .ok_or_else(|| PipelineError::NoData {
                station: self.station_id.clone(),
            })
    }

    fn request_url(&self) -> Url {
        // ---
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("Authorization", &self.api_key)
            .append_pair("limit", "1")
            .append_pair("format", "JSON")
            .append_pair("StationId", &self.station_id);
        url
    }

    // The request URL carries the API key, so it is stripped from the error.
    fn fetch_error(&self, e: reqwest::Error) -> PipelineError {
        PipelineError::Fetch {
            endpoint: self.endpoint.to_string(),
            source: e.without_url(),
        }
    }
}
