//! Weather service: forecast lookup with a guaranteed fallback

use serde::Serialize;
use shared::{Notice, WeatherReading, WeatherSource};

use crate::external::weather::WeatherClient;

/// Weather service wrapping the forecast client
#[derive(Clone)]
pub struct WeatherService {
    weather_client: WeatherClient,
}

/// Reading used for a report plus how it was obtained
#[derive(Debug, Clone, Serialize)]
pub struct WeatherOutcome {
    pub reading: WeatherReading,
    pub source: WeatherSource,
    /// Set when the forecast failed and the fallback reading was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl WeatherOutcome {
    pub fn fallback(reason: impl std::fmt::Display) -> Self {
        Self {
            reading: WeatherReading::fallback(),
            source: WeatherSource::Fallback,
            notice: Some(Notice::error(format!("Weather API Error: {}", reason))),
        }
    }
}

impl WeatherService {
    pub fn new(weather_client: WeatherClient) -> Self {
        Self { weather_client }
    }

    /// Fetch the forecast for a city, falling back to the default reading
    ///
    /// Never fails: any transport, status or parse problem is reported
    /// through the outcome's notice instead.
    pub async fn fetch_or_fallback(&self, city: &str) -> WeatherOutcome {
        match self.weather_client.get_forecast(city).await {
            Ok(reading) => {
                tracing::info!(
                    city,
                    temperature = reading.temperature_celsius,
                    humidity = reading.humidity_percent,
                    rain_expected = reading.rain_expected,
                    "Forecast fetched"
                );
                WeatherOutcome {
                    reading,
                    source: WeatherSource::Forecast,
                    notice: None,
                }
            }
            Err(e) => {
                tracing::warn!(city, error = %e, "Forecast unavailable, using fallback weather");
                WeatherOutcome::fallback(e)
            }
        }
    }
}
