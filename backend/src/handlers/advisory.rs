//! HTTP handlers for advisory report endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shared::{validate_location, validate_percentage, CropHealth, Recommendation, RngSampler, VegetationBand};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::advisory::{AdvisoryRequest, GeneratedReport};
use crate::AppState;

/// Form fields of a report submission
#[derive(Debug, Default, Validate)]
pub struct ReportForm {
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    pub image: Option<Vec<u8>>,
}

impl ReportForm {
    /// Collect the `city` and `image` fields; other fields are ignored
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = ReportForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidMultipart(e.to_string()))?
        {
            match field.name() {
                Some("city") => {
                    form.city = field
                        .text()
                        .await
                        .map_err(|e| AppError::InvalidMultipart(e.to_string()))?
                        .trim()
                        .to_string();
                }
                Some("image") => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::InvalidMultipart(e.to_string()))?;
                    if image_part_chosen(file_name.as_deref(), &bytes) {
                        form.image = Some(bytes.to_vec());
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Whether an `image` part carries an upload
///
/// Browsers send an empty part with an empty file name when nothing was
/// chosen. Any part with content is an upload; an empty part only counts
/// when it names a file, so it is rejected as an empty image later.
fn image_part_chosen(file_name: Option<&str>, bytes: &[u8]) -> bool {
    !bytes.is_empty() || file_name.map(|name| !name.is_empty()).unwrap_or(false)
}

/// Download links for the generated artifacts
#[derive(Debug, Serialize)]
pub struct ReportDownloads {
    pub txt_url: String,
    pub pdf_url: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub generated: GeneratedReport,
    pub downloads: ReportDownloads,
    pub message: String,
}

/// Generate a report from a city name and optional crop image
pub async fn create_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ReportResponse>> {
    let form = ReportForm::from_multipart(multipart).await?;
    form.validate()?;
    validate_location(&form.city).map_err(|msg| AppError::validation("city", msg))?;

    let now = chrono::Local::now().naive_local();
    let mut sampler = RngSampler::new(StdRng::from_entropy());

    let generated = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: form.city,
                image: form.image,
            },
            now,
            &mut sampler,
        )
        .await?;

    let downloads = ReportDownloads {
        txt_url: format!("/api/v1/advisory/reports/{}", generated.files.txt_file),
        pdf_url: format!("/api/v1/advisory/reports/{}", generated.files.pdf_file),
    };

    Ok(Json(ReportResponse {
        generated,
        downloads,
        message: "Report generated successfully".to_string(),
    }))
}

/// Download a generated report artifact
pub async fn download_report(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (kind, bytes) = state.reporting.read_artifact(&file_name)?;

    Ok((
        [
            (header::CONTENT_TYPE, kind.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}

/// Query parameters for a standalone recommendation
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationQuery {
    #[validate(range(min = 0.0, max = 100.0, message = "healthy_percent must be between 0 and 100"))]
    pub healthy_percent: f64,
    #[serde(default)]
    pub rain_expected: bool,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub crop_health: CropHealth,
    pub band: VegetationBand,
    pub recommendation: Recommendation,
    pub message: &'static str,
}

/// Evaluate the advisory rules without generating a report
pub async fn get_recommendation(
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    query.validate()?;
    validate_percentage(query.healthy_percent)
        .map_err(|msg| AppError::validation("healthy_percent", msg))?;

    let crop_health = CropHealth::from_vegetation_ratio(query.healthy_percent);
    let band = crop_health.band();
    let recommendation = Recommendation::for_band(band, query.rain_expected);

    Ok(Json(RecommendationResponse {
        crop_health,
        band,
        recommendation,
        message: recommendation.message(),
    }))
}
