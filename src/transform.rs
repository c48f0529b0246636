//! Raw observation → normalized observation.
//!
//! Pure functions only. The source marks "not reported" with a fixed
//! out-of-range constant; that constant, and a missing element, both become
//! `None` here and nowhere else.

use chrono::{NaiveDateTime, Timelike};

use crate::error::PipelineError;
use crate::models::{NormalizedObservation, RawObservation, RawValue, Trend};

// ---

/// Value the source uses for "no reading".
pub const SENTINEL: f64 = -99.0;

/// Temperatures above this read as rising.
pub const TREND_HIGH_C: f64 = 23.0;

/// Temperatures below this read as falling.
pub const TREND_LOW_C: f64 = 22.0;

impl RawObservation {
    // ---
    /// Normalize every field. Either all of them succeed or the run aborts.
    pub fn normalize(&self) -> Result<NormalizedObservation, PipelineError> {
        // ---
        let obs_time = self
            .obs_date_time()
            .ok_or_else(|| PipelineError::parse("ObsTime", ""))
            .and_then(parse_obs_time)?;
        let temp = reading("AirTemperature", self.weather.air_temperature.as_ref())?;
        let hum = reading("RelativeHumidity", self.weather.relative_humidity.as_ref())?;
        let wind = reading("WindSpeed", self.weather.wind_speed.as_ref())?.unwrap_or(0.0);
        let rain = rainfall(self.weather.hourly_rainfall.as_ref())?;

        Ok(NormalizedObservation {
            obs_time,
            temp,
            hum,
            wind,
            rain,
            feels_like: feels_like(temp, hum),
        })
    }
}

/// Parse the source timestamp and truncate it to the minute.
///
/// The source sends local time with an offset (`2025-11-21T14:02:10+08:00`);
/// the stored key is the local wall-clock minute, offset dropped.
pub fn parse_obs_time(raw: &str) -> Result<NaiveDateTime, PipelineError> {
    // ---
    let minute = raw
        .trim()
        .get(..16)
        .ok_or_else(|| PipelineError::parse("ObsTime", raw))?
        .replace('T', " ");

    NaiveDateTime::parse_from_str(&minute, "%Y-%m-%d %H:%M")
        .ok()
        .and_then(|t| t.with_second(0))
        .ok_or_else(|| PipelineError::parse("ObsTime", raw))
}

/// Coerce a numeric element; missing or sentinel means "not reported".
fn reading(field: &'static str, value: Option<&RawValue>) -> Result<Option<f64>, PipelineError> {
    // ---
    let number = match value {
        None => return Ok(None),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => parse_number(field, s)?,
        Some(RawValue::Other(v)) => return Err(PipelineError::parse(field, v.to_string())),
    };

    Ok((number != SENTINEL).then_some(number))
}

/// Hourly rainfall in mm, never negative.
///
/// Trace amounts, "no data" and blanks all count as no rain.
pub fn rainfall(value: Option<&RawValue>) -> Result<f64, PipelineError> {
    // ---
    let amount = match value {
        None => return Ok(0.0),
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("TRACE") || s.eq_ignore_ascii_case("T") {
                return Ok(0.0);
            }
            parse_number("HourlyRainfall", s)?
        }
        Some(RawValue::Other(v)) => return Err(PipelineError::parse("HourlyRainfall", v.to_string())),
    };

    if amount == SENTINEL {
        Ok(0.0)
    } else if amount < 0.0 {
        Err(PipelineError::parse("HourlyRainfall", amount.to_string()))
    } else {
        Ok(amount)
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, PipelineError> {
    // ---
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| PipelineError::parse(field, raw))
}

/// Apparent temperature from air temperature (°C) and relative humidity (%),
/// rounded to one decimal. `None` unless both inputs were reported.
pub fn feels_like(temp: Option<f64>, hum: Option<f64>) -> Option<f64> {
    // ---
    let (t, h) = (temp?, hum?);
    let vapour_pressure = 6.105 * 10f64.powf(7.5 * t / (237.7 + t)) * (h / 100.0);
    Some(round1(t + 0.33 * vapour_pressure - 4.0))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify a temperature against the fixed display thresholds.
///
/// An unreported temperature is shown as steady.
pub fn trend(temp: Option<f64>) -> Trend {
    match temp {
        Some(t) if t > TREND_HIGH_C => Trend::Rising,
        Some(t) if t < TREND_LOW_C => Trend::Falling,
        _ => Trend::Steady,
    }
}
