//! LINE Flex message rendering for one observation.
//!
//! Layout: a blue header with station name and time, a hero block with the
//! temperature and feels-like, then a detail block (humidity, wind, rain)
//! closed by the trend line.

use serde_json::{json, Value};

use crate::models::{NormalizedObservation, Trend};
use crate::transform::trend;

// ---

const HEADER_COLOR: &str = "#1E90FF";
const RAINING_COLOR: &str = "#FF4500";
const DRY_COLOR: &str = "#32CD32";
const UNAVAILABLE: &str = "N/A";

/// Hero text for the air temperature, e.g. `24.0°C`.
pub fn temperature_text(obs: &NormalizedObservation) -> String {
    format!("{}°C", one_decimal(obs.temp))
}

pub fn feels_like_text(obs: &NormalizedObservation) -> String {
    format!("體感 {}°C", one_decimal(obs.feels_like))
}

fn humidity_text(obs: &NormalizedObservation) -> String {
    format!("{}%", one_decimal(obs.hum))
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| format!("{v:.1}"))
}

/// Rain status text and its color.
fn rain_status(obs: &NormalizedObservation) -> (&'static str, &'static str) {
    if obs.rain > 0.0 {
        ("正在下雨 💧", RAINING_COLOR)
    } else {
        ("無降雨 ☀️", DRY_COLOR)
    }
}

/// One-line trend summary, e.g. `近24小時趨勢：↗️↗️… (升溫中)`.
pub fn trend_text(trend: Trend) -> String {
    // ---
    let (arrow, label) = match trend {
        Trend::Rising => ("↗️", "升溫中"),
        Trend::Falling => ("↘️", "降溫中"),
        Trend::Steady => ("➖", "穩定"),
    };
    format!("近24小時趨勢：{} {arrow} ({label})", arrow.repeat(8))
}

fn detail_row(label: &str, value: Value) -> Value {
    json!({
        "type": "box",
        "layout": "horizontal",
        "contents": [
            { "type": "text", "text": label, "flex": 2 },
            value
        ]
    })
}

/// Build the Flex message object for `obs`.
pub fn flex_message(station_name: &str, obs: &NormalizedObservation) -> Value {
    // ---
    let obs_time = obs.obs_time_display();
    let (rain_text, rain_color) = rain_status(obs);

    let mut humidity = detail_row("濕度", json!({ "type": "text", "text": humidity_text(obs), "align": "end" }));
    humidity["margin"] = json!("lg");
    let wind = detail_row(
        "風速",
        json!({ "type": "text", "text": format!("{:.1} m/s", obs.wind), "align": "end" }),
    );
    let mut rain = detail_row(
        "降雨",
        json!({ "type": "text", "text": rain_text, "align": "end", "color": rain_color }),
    );
    rain["margin"] = json!("lg");

    json!({
        "type": "flex",
        "altText": format!("{station_name}天氣更新 {obs_time}"),
        "contents": {
            "type": "bubble",
            "header": {
                "type": "box",
                "layout": "vertical",
                "backgroundColor": HEADER_COLOR,
                "contents": [
                    { "type": "text", "text": format!("{station_name}即時天氣"), "weight": "bold", "size": "xl", "color": "#FFFFFF" },
                    { "type": "text", "text": obs_time, "size": "sm", "color": "#FFFFFFAA" }
                ]
            },
            "hero": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    { "type": "text", "text": temperature_text(obs), "size": "4xl", "weight": "bold", "align": "center" },
                    { "type": "text", "text": feels_like_text(obs), "size": "lg", "align": "center", "color": "#666666" }
                ]
            },
            "body": {
                "type": "box",
                "layout": "vertical",
                "contents": [
                    { "type": "separator", "margin": "lg" },
                    humidity,
                    wind,
                    rain,
                    { "type": "separator", "margin": "lg" },
                    { "type": "text", "text": trend_text(trend(obs.temp)), "margin": "lg", "size": "sm", "color": "#555555" }
                ]
            }
        }
    })
}
