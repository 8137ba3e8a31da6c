//! Advisory report record and its text rendering

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::advisory::Recommendation;
use super::crop::CropHealth;
use super::weather::{WeatherReading, WeatherSource};

/// Prefix shared by every generated artifact file name
pub const REPORT_FILE_PREFIX: &str = "AgriSmart_Report_";

/// Everything computed during one report generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisoryReport {
    pub location: String,
    /// Appended to the location on the region line, e.g. a state name
    pub region_suffix: Option<String>,
    pub generated_at: NaiveDateTime,
    /// Weather after adjustment; the raw reading is not kept
    pub weather: WeatherReading,
    pub weather_source: WeatherSource,
    pub crop_health: CropHealth,
    pub recommendation: Recommendation,
}

impl AdvisoryReport {
    pub fn region_line(&self) -> String {
        match self.region_suffix.as_deref().map(str::trim) {
            Some(suffix) if !suffix.is_empty() => format!("{}, {}", self.location, suffix),
            _ => self.location.clone(),
        }
    }

    /// Token shared by the text and PDF file names of this run
    pub fn timestamp_token(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }

    pub fn file_stem(&self) -> String {
        format!("{}{}", REPORT_FILE_PREFIX, self.timestamp_token())
    }

    /// Render the human-readable report
    ///
    /// Section order and headers are relied on by consumers of the text file.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "Region: {}", self.region_line())?;
        writeln!(out, "Date: {}", self.generated_at.format("%d-%m-%Y"))?;
        writeln!(out)?;
        writeln!(out, "--- Weather Forecast (AI-Adjusted) ---")?;
        writeln!(out, "Rain Forecast: {}", self.weather.rain_forecast_label())?;
        writeln!(out, "Temperature: {:.1}°C", self.weather.temperature_celsius)?;
        writeln!(out, "Humidity: {:.1}%", self.weather.humidity_percent)?;
        writeln!(out, "Wind Speed: {:.1} km/h", self.weather.wind_speed_kmh)?;
        writeln!(out)?;
        writeln!(out, "--- Drone-Based Crop Analysis ---")?;
        writeln!(out, "Healthy Crop: {:.1}%", self.crop_health.healthy_percent)?;
        writeln!(out, "Stressed Crop: {:.1}%", self.crop_health.stressed_percent)?;
        writeln!(out)?;
        writeln!(out, "--- Sustainable Advisory ---")?;
        writeln!(out, "{}", self.recommendation)
    }
}
