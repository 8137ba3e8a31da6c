//! Weather data models

use serde::{Deserialize, Serialize};

/// Weather conditions a report is built from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    /// True when rain is mentioned in the first five forecast entries
    pub rain_expected: bool,
}

impl WeatherReading {
    pub const FALLBACK_TEMPERATURE_CELSIUS: f64 = 30.0;
    pub const FALLBACK_HUMIDITY_PERCENT: f64 = 60.0;
    pub const FALLBACK_WIND_SPEED_KMH: f64 = 3.0;

    pub fn new(
        temperature_celsius: f64,
        humidity_percent: f64,
        wind_speed_kmh: f64,
        rain_expected: bool,
    ) -> Self {
        Self {
            temperature_celsius,
            humidity_percent,
            wind_speed_kmh,
            rain_expected,
        }
    }

    /// Reading used whenever the forecast cannot be fetched
    pub fn fallback() -> Self {
        Self::new(
            Self::FALLBACK_TEMPERATURE_CELSIUS,
            Self::FALLBACK_HUMIDITY_PERCENT,
            Self::FALLBACK_WIND_SPEED_KMH,
            false,
        )
    }

    /// Label printed on the "Rain Forecast" line of the report
    pub fn rain_forecast_label(&self) -> &'static str {
        if self.rain_expected {
            "High (Expected Soon)"
        } else {
            "Low"
        }
    }
}

/// Where a reading came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Forecast,
    Fallback,
}
