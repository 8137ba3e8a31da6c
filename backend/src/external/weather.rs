//! Weather API client for fetching forecast data
//!
//! Integrates with the OpenWeatherMap 5 day / 3 hour forecast API

use reqwest::Client;
use serde::Deserialize;
use shared::WeatherReading;
use std::time::Duration;
use thiserror::Error;

/// Number of leading forecast entries scanned for rain
pub const RAIN_LOOKAHEAD_ENTRIES: usize = 5;

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Reasons a forecast could not be turned into a reading
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather API key is not configured")]
    MissingApiKey,

    #[error("Weather API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse forecast response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Forecast response contains no entries")]
    EmptyForecast,

    #[error("Forecast entry {0} has no weather category")]
    MissingCategory(usize),
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    main: OWMMain,
    weather: Vec<OWMWeather>,
    wind: OWMWind,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

impl WeatherClient {
    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with a request timeout
    pub fn with_timeout(api_key: String, base_url: String, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the forecast for a place name and summarise it
    pub async fn get_forecast(&self, city: &str) -> Result<WeatherReading, WeatherError> {
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let url = format!("{}/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status { status, body });
        }

        let body = response.text().await?;
        parse_forecast(&body)
    }
}

/// Summarise a forecast response body into a reading
///
/// The first entry supplies temperature, humidity and wind; rain is expected
/// when any of the first [`RAIN_LOOKAHEAD_ENTRIES`] entries has a weather
/// category mentioning rain.
pub fn parse_forecast(body: &str) -> Result<WeatherReading, WeatherError> {
    let data: OWMForecastResponse = serde_json::from_str(body)?;
    let first = data.list.first().ok_or(WeatherError::EmptyForecast)?;

    let mut rain_expected = false;
    for (index, entry) in data.list.iter().take(RAIN_LOOKAHEAD_ENTRIES).enumerate() {
        let category = entry
            .weather
            .first()
            .ok_or(WeatherError::MissingCategory(index))?;
        if category.main.to_lowercase().contains("rain") {
            rain_expected = true;
        }
    }

    Ok(WeatherReading::new(
        first.main.temp,
        first.main.humidity,
        first.wind.speed,
        rain_expected,
    ))
}
