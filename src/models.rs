//! Data models for the weather pipeline.
//!
//! The raw side mirrors the CWA `O-A0001-001` response closely enough for
//! serde to do the presence checks: every element the source may omit is an
//! `Option`, and scalar elements accept any JSON value. Deciding whether a
//! value is usable is left to the transform stage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

// ---

/// Top-level CWA datastore response.
#[derive(Debug, Deserialize)]
pub struct CwaResponse {
    pub records: CwaRecords,
}

#[derive(Debug, Deserialize)]
pub struct CwaRecords {
    #[serde(rename = "Station", default, deserialize_with = "null_as_empty")]
    pub station: Vec<RawObservation>,
}

// The datastore sends `"Station": null` when nothing matched the query.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<RawObservation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw observation for one station, exactly as the source reported it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    // ---
    #[serde(rename = "StationId", default)]
    pub station_id: String,
    #[serde(rename = "StationName", default)]
    pub station_name: Option<String>,
    #[serde(rename = "ObsTime", default)]
    pub obs_time: Option<ObsTime>,
    #[serde(rename = "WeatherElement", default)]
    pub weather: WeatherElement,
}

impl RawObservation {
    /// The source timestamp, if the record carried one.
    pub fn obs_date_time(&self) -> Option<&str> {
        self.obs_time.as_ref().and_then(|t| t.date_time.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObsTime {
    /// Source-local ISO-8601 timestamp, e.g. `2025-11-21T14:00:00+08:00`.
    #[serde(rename = "DateTime", default)]
    pub date_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherElement {
    #[serde(rename = "AirTemperature", default)]
    pub air_temperature: Option<RawValue>,
    #[serde(rename = "RelativeHumidity", default)]
    pub relative_humidity: Option<RawValue>,
    #[serde(rename = "WindSpeed", default)]
    pub wind_speed: Option<RawValue>,
    #[serde(rename = "HourlyRainfall", default)]
    pub hourly_rainfall: Option<RawValue>,
}

/// A scalar as it appears on the wire.
///
/// Anything that is neither a number nor a string lands in `Other` so the
/// response still decodes and the transform stage can reject the reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// Normalized observation, ready to persist and render.
///
/// `None` is the only representation of a missing reading; sentinel values
/// never make it into this type.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct NormalizedObservation {
    // ---
    pub obs_time: NaiveDateTime,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub wind: f64,
    pub rain: f64,
    pub feels_like: Option<f64>,
}

impl NormalizedObservation {
    /// Minute-precision timestamp as shown to people, `YYYY-MM-DD HH:MM`.
    pub fn obs_time_display(&self) -> String {
        self.obs_time.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Display-only temperature direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}
