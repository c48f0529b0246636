//! Push delivery through the LINE Messaging API.

use reqwest::Client;
use serde_json::json;

use crate::config::Config;
use crate::error::PipelineError;
use crate::message::flex_message;
use crate::models::NormalizedObservation;

// ---

const PUSH_PATH: &str = "/v2/bot/message/push";

#[derive(Clone)]
pub struct LineNotifier {
    client: Client,
    endpoint: String,
    token: String,
    user_id: String,
    station_name: String,
}

impl LineNotifier {
    // ---
    pub fn new(
        client: Client,
        api_url: &str,
        token: impl Into<String>,
        user_id: impl Into<String>,
        station_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: format!("{}{PUSH_PATH}", api_url.trim_end_matches('/')),
            token: token.into(),
            user_id: user_id.into(),
            station_name: station_name.into(),
        }
    }

    pub fn from_config(client: Client, cfg: &Config) -> Self {
        Self::new(
            client,
            &cfg.line_api_url,
            &cfg.line_channel_token,
            &cfg.line_user_id,
            &cfg.station_name,
        )
    }

    /// Render `obs` and push it to the configured recipient.
    pub async fn push(&self, obs: &NormalizedObservation) -> Result<(), PipelineError> {
        // ---
        let payload = json!({
            "to": self.user_id,
            "messages": [flex_message(&self.station_name, obs)],
        });

        tracing::debug!(
            endpoint = %self.endpoint,
            obs_time = %obs.obs_time_display(),
            "pushing notification"
        );

        self.client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PipelineError::Notify {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        Ok(())
    }
}

impl std::fmt::Debug for LineNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineNotifier")
            .field("endpoint", &self.endpoint)
            .field("station_name", &self.station_name)
            .finish_non_exhaustive()
    }
}
