use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::error::WeatherError;
use crate::models::{CurrentConditions, DayForecast, ForecastEntry, ForecastPayload, WeatherSnapshot};

/// 3-hour resolution means 8 entries per day.
const DAY_STRIDE: usize = 8;
const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Fetch a 5-day/3-hour forecast and normalize it. Called once per page
/// load for display and once more per analysis cycle; the two fetches are
/// independent so the prompt never sees a stale snapshot.
pub async fn fetch_forecast(
    client: &Client,
    config: &Config,
    coords: Coordinates,
) -> Result<WeatherSnapshot, WeatherError> {
    let url = format!(
        "{}?lat={}&lon={}&appid={}&units=metric",
        config.weather_endpoint, coords.lat, coords.lon, config.weather_api_key
    );

    info!("Fetching forecast for ({:.3}, {:.3})...", coords.lat, coords.lon);

    let resp = client.get(&url).send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(WeatherError::Provider { status, body });
    }

    let payload: ForecastPayload =
        serde_json::from_str(&body).map_err(|e| WeatherError::Malformed(e.to_string()))?;

    normalize(payload)
}

/// Current conditions come from the first entry; the per-day forecast takes
/// one representative entry per day at a fixed stride past the current one
/// (roughly the same hour next day). A short series just yields fewer days.
pub fn normalize(payload: ForecastPayload) -> Result<WeatherSnapshot, WeatherError> {
    let tz_offset = payload.city.as_ref().map(|c| c.timezone).unwrap_or(0);

    let first = payload
        .list
        .first()
        .ok_or_else(|| WeatherError::Malformed("forecast list is empty".to_string()))?;

    let current = CurrentConditions {
        temperature_c: first.main.temp,
        humidity_percent: first.main.humidity,
        condition: condition_of(first),
        description: description_of(first),
        observed_at: observed_label(first, tz_offset),
    };

    let days = payload
        .list
        .iter()
        .skip(DAY_STRIDE - 1)
        .step_by(DAY_STRIDE)
        .take(FORECAST_DAYS)
        .map(|entry| DayForecast {
            day_label: day_label(entry.dt, tz_offset),
            temperature_c: entry.main.temp,
            humidity_percent: entry.main.humidity,
            condition: condition_of(entry),
        })
        .collect();

    Ok(WeatherSnapshot { current, days })
}

fn condition_of(entry: &ForecastEntry) -> String {
    entry.weather.first().map(|w| w.main.clone()).unwrap_or_default()
}

fn description_of(entry: &ForecastEntry) -> String {
    entry
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_default()
}

fn observed_label(entry: &ForecastEntry, tz_offset: i64) -> String {
    if !entry.dt_txt.is_empty() {
        return entry.dt_txt.clone();
    }
    chrono::DateTime::from_timestamp(entry.dt + tz_offset, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn day_label(dt: i64, tz_offset: i64) -> String {
    chrono::DateTime::from_timestamp(dt + tz_offset, 0)
        .map(|t| t.format("%a").to_string())
        .unwrap_or_default()
}
