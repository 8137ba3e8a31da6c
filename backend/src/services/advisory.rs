//! Advisory service: runs the full report pipeline for one request
//!
//! weather fetch -> vegetation estimate -> weather adjustment ->
//! recommendation -> text/PDF artifacts. Each step runs once, in order.

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::{build_report, AdvisoryReport, Notice, OffsetSampler, ReportInput, VegetationAnalysis};

use crate::error::AppResult;
use crate::services::reporting::{ReportArtifacts, ReportingService, SavedReport};
use crate::services::vegetation::{ImageSummary, VegetationService};
use crate::services::weather::WeatherService;

/// One report request
#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    pub city: String,
    /// Raw image upload, if any
    pub image: Option<Vec<u8>>,
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedReport {
    pub report: AdvisoryReport,
    pub report_text: String,
    pub notices: Vec<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSummary>,
    pub files: SavedReport,
}

/// Advisory pipeline service
#[derive(Clone)]
pub struct AdvisoryService {
    weather: WeatherService,
    vegetation: VegetationService,
    reporting: ReportingService,
    region_suffix: Option<String>,
}

impl AdvisoryService {
    pub fn new(
        weather: WeatherService,
        vegetation: VegetationService,
        reporting: ReportingService,
        region_suffix: Option<String>,
    ) -> Self {
        Self {
            weather,
            vegetation,
            reporting,
            region_suffix,
        }
    }

    /// Generate a report and write its artifacts
    ///
    /// A malformed image aborts before the forecast is requested. Weather
    /// failures and a missing image only add notices.
    pub async fn generate<S>(
        &self,
        request: AdvisoryRequest,
        now: NaiveDateTime,
        sampler: &mut S,
    ) -> AppResult<GeneratedReport>
    where
        S: OffsetSampler + ?Sized,
    {
        let mut notices = Vec::new();

        let (vegetation, image) = match request.image.as_deref() {
            Some(bytes) => {
                let analysed = self.vegetation.analyze_upload(bytes)?;
                let summary = analysed.summary();
                (analysed.analysis, Some(summary))
            }
            None => {
                tracing::warn!(city = %request.city, "No crop image supplied, assuming default vegetation ratio");
                (VegetationAnalysis::absent(), None)
            }
        };

        let weather = self.weather.fetch_or_fallback(request.city.trim()).await;
        notices.extend(weather.notice.clone());
        notices.extend(vegetation.notice.clone());

        let input = ReportInput {
            location: request.city,
            region_suffix: self.region_suffix.clone(),
        };
        let report = build_report(&input, weather.reading, weather.source, &vegetation, now, sampler);

        tracing::info!(
            location = %report.location,
            healthy = report.crop_health.healthy_percent,
            band = %report.crop_health.band(),
            recommendation = ?report.recommendation,
            "Advisory computed"
        );

        let artifacts = ReportArtifacts::render(&report)?;
        let files = self.reporting.write_artifacts(&artifacts)?;

        Ok(GeneratedReport {
            report,
            report_text: artifacts.text,
            notices,
            image,
            files,
        })
    }
}
