//! The advisory decision pipeline, free of any I/O
//!
//! Weather and vegetation inputs arrive already fetched/decoded; this module
//! only adjusts, decides and assembles the report record.

use chrono::NaiveDateTime;

use crate::adjustment::{adjust_weather, OffsetSampler};
use crate::models::{AdvisoryReport, CropHealth, Recommendation, WeatherReading, WeatherSource};
use crate::vegetation::VegetationAnalysis;

/// Caller-supplied parameters of one run
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub location: String,
    pub region_suffix: Option<String>,
}

/// Build the report record for one run
pub fn build_report<S>(
    input: &ReportInput,
    weather: WeatherReading,
    weather_source: WeatherSource,
    vegetation: &VegetationAnalysis,
    now: NaiveDateTime,
    sampler: &mut S,
) -> AdvisoryReport
where
    S: OffsetSampler + ?Sized,
{
    let crop_health = CropHealth::from_vegetation_ratio(vegetation.green_ratio);
    let band = crop_health.band();
    let adjusted = adjust_weather(weather, band, sampler);
    let recommendation = Recommendation::for_band(band, adjusted.rain_expected);

    AdvisoryReport {
        location: input.location.trim().to_string(),
        region_suffix: input.region_suffix.clone(),
        generated_at: now,
        weather: adjusted,
        weather_source,
        crop_health,
        recommendation,
    }
}
