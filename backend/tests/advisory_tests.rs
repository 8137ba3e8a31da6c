//! Advisory pipeline integration tests
//!
//! End-to-end report generation through the service layer and the HTTP
//! router, with the forecast API replaced by a local stub.

mod common;

use agri_smart_backend::services::advisory::AdvisoryRequest;
use agri_smart_backend::{create_app, AppError, AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use common::{
    artifact_names, forecast_body, forecast_entry, spawn_forecast_stub, test_config,
};
use image::{ImageFormat, Rgb, RgbImage};
use shared::{FixedSampler, Recommendation, VegetationBand, WeatherSource};
use std::io::Cursor;
use tower::ServiceExt;

const BOUNDARY: &str = "agrismart-test-boundary";

fn run_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 3)
        .unwrap()
        .and_hms_opt(9, 5, 7)
        .unwrap()
}

fn png(colour: [u8; 3]) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(20, 20, Rgb(colour))
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

async fn malformed_forecast() -> String {
    spawn_forecast_stub(StatusCode::OK, "not json".to_string()).await
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_chennai_without_image_or_forecast() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_config(test_config(&malformed_forecast().await, dir.path())).unwrap();

    let generated = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: "Chennai".to_string(),
                image: None,
            },
            run_time(),
            &mut FixedSampler::midpoint(),
        )
        .await
        .unwrap();

    assert_eq!(generated.report.weather_source, WeatherSource::Fallback);
    assert_eq!(generated.report.crop_health.healthy_percent, 50.0);
    assert_eq!(generated.report.crop_health.stressed_percent, 50.0);
    assert_eq!(generated.report.recommendation, Recommendation::ModerateIrrigate);
    assert_eq!(generated.notices.len(), 2);
    assert!(generated.image.is_none());

    let text = &generated.report_text;
    assert!(text.contains("Region: Chennai, Tamil Nadu"));
    assert!(text.contains("Date: 03-07-2024"));
    assert!(text.contains("Rain Forecast: Low"));
    assert!(text.contains("Temperature: 30.3°C"));
    assert!(text.contains("Humidity: 60.5%"));
    assert!(text.contains("Wind Speed: 3.0 km/h"));
    assert!(text.contains("Healthy Crop: 50.0%"));
    assert!(text.contains("Stressed Crop: 50.0%"));
    assert!(text.ends_with(
        "Moderate stress. Irrigate soon & monitor greenness with next image upload.\n"
    ));

    assert_eq!(
        artifact_names(dir.path()),
        vec![
            "AgriSmart_Report_20240703_090507.pdf".to_string(),
            "AgriSmart_Report_20240703_090507.txt".to_string(),
        ]
    );
    let written = std::fs::read_to_string(&generated.files.txt_path).unwrap();
    assert_eq!(&written, text);
    let pdf = std::fs::read(&generated.files.pdf_path).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn test_green_image_with_rain_forecast() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = spawn_forecast_stub(
        StatusCode::OK,
        forecast_body(&[
            forecast_entry(28.0, 70.0, 2.0, "Clouds"),
            forecast_entry(27.0, 80.0, 3.0, "Rain"),
        ]),
    )
    .await;
    let state = AppState::from_config(test_config(&base_url, dir.path())).unwrap();

    let generated = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: "Madurai".to_string(),
                image: Some(png([40, 170, 50])),
            },
            run_time(),
            &mut FixedSampler::new(0.0),
        )
        .await
        .unwrap();

    assert_eq!(generated.report.weather_source, WeatherSource::Forecast);
    assert_eq!(generated.report.crop_health.band(), VegetationBand::Healthy);
    assert_eq!(generated.report.recommendation, Recommendation::HealthyDelayIrrigation);
    // healthy band lower bounds: -1.5 degrees, +3 humidity
    assert_eq!(generated.report.weather.temperature_celsius, 26.5);
    assert_eq!(generated.report.weather.humidity_percent, 73.0);
    assert!(generated.notices.is_empty());
    assert_eq!(generated.image.unwrap().caption, "Crop Analysis: 100.00% Green");
    assert!(generated.report_text.contains("Rain Forecast: High (Expected Soon)"));
}

#[tokio::test]
async fn test_red_image_is_severe_stress() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_config(test_config(&malformed_forecast().await, dir.path())).unwrap();

    let generated = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: "Salem".to_string(),
                image: Some(png([210, 25, 25])),
            },
            run_time(),
            &mut FixedSampler::new(1.0),
        )
        .await
        .unwrap();

    assert_eq!(generated.report.crop_health.healthy_percent, 0.0);
    assert_eq!(generated.report.crop_health.stressed_percent, 100.0);
    assert_eq!(generated.report.recommendation, Recommendation::SevereStress);
    // stressed band upper bounds applied to the fallback reading
    assert_eq!(generated.report.weather.temperature_celsius, 32.5);
    assert_eq!(generated.report.weather.humidity_percent, 55.0);
    assert_eq!(generated.report.weather.wind_speed_kmh, 5.0);
}

#[tokio::test]
async fn test_corrupt_image_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::from_config(test_config(&malformed_forecast().await, dir.path())).unwrap();

    let err = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: "Chennai".to_string(),
                image: Some(b"\x89PNG\r\n\x1a\ntruncated".to_vec()),
            },
            run_time(),
            &mut FixedSampler::midpoint(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidImage(_)));
    assert!(artifact_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_unwritable_output_leaves_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the output directory should be
    let blocked = dir.path().join("reports");
    std::fs::write(&blocked, b"occupied").unwrap();
    let state = AppState::from_config(test_config(&malformed_forecast().await, &blocked)).unwrap();

    let err = state
        .advisory
        .generate(
            AdvisoryRequest {
                city: "Chennai".to_string(),
                image: None,
            },
            run_time(),
            &mut FixedSampler::midpoint(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ReportWrite(_)));
    assert_eq!(artifact_names(dir.path()), vec!["reports".to_string()]);
}

#[tokio::test]
async fn test_same_seed_same_report() {
    use rand::{rngs::StdRng, SeedableRng};
    use shared::RngSampler;

    let base_url = malformed_forecast().await;
    let mut texts = Vec::new();
    for _ in 0..2 {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::from_config(test_config(&base_url, dir.path())).unwrap();
        let generated = state
            .advisory
            .generate(
                AdvisoryRequest {
                    city: "Chennai".to_string(),
                    image: None,
                },
                run_time(),
                &mut RngSampler::new(StdRng::seed_from_u64(7)),
            )
            .await
            .unwrap();
        texts.push(generated.report_text);
    }

    assert_eq!(texts[0], texts[1]);
}

// ============================================================================
// Router Tests
// ============================================================================

async fn app_in(dir: &std::path::Path) -> Router {
    let state = AppState::from_config(test_config(&malformed_forecast().await, dir)).unwrap();
    create_app(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_request(city: Option<&str>, image: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(city) = city {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"city\"\r\n\r\n{}\r\n",
                BOUNDARY, city
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/advisory/reports")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    for uri in ["/health", "/api/v1/health"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["environment"], "development");
        assert_eq!(json["weather_api"], "configured");
    }
}

#[tokio::test]
async fn test_recommendation_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/v1/advisory/recommendation?healthy_percent=85&rain_expected=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["recommendation"], "healthy_delay_irrigation");
    assert_eq!(json["crop_health"]["stressed_percent"], 15.0);

    let response = app
        .oneshot(
            Request::get("/api/v1/advisory/recommendation?healthy_percent=150")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_report_requires_city() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    for city in [None, Some("   ")] {
        let response = app.clone().oneshot(multipart_request(city, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["field"], "city");
    }
    assert!(artifact_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_create_report_rejects_corrupt_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let response = app
        .oneshot(multipart_request(Some("Chennai"), Some(("field.jpg", &b"garbage"[..]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "INVALID_IMAGE");
}

#[tokio::test]
async fn test_image_without_file_name_is_analysed() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    // content with an empty file name must not fall back to the default ratio
    let response = app
        .clone()
        .oneshot(multipart_request(Some("Chennai"), Some(("", &b"garbage"[..]))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let image = png([210, 25, 25]);
    let response = app
        .oneshot(multipart_request(Some("Chennai"), Some(("", image.as_slice()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["report"]["crop_health"]["healthy_percent"], 0.0);
    assert_eq!(json["report"]["recommendation"], "severe_stress");
}

#[tokio::test]
async fn test_empty_image_part_means_no_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;

    let response = app
        .oneshot(multipart_request(Some("Chennai"), Some(("", &b""[..]))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["report"]["crop_health"]["healthy_percent"], 50.0);
    assert!(json.get("image").is_none());
}

#[tokio::test]
async fn test_create_and_download_report() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_in(dir.path()).await;
    let image = png([30, 200, 30]);

    let response = app
        .clone()
        .oneshot(multipart_request(Some("Chennai"), Some(("field.png", image.as_slice()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["report"]["location"], "Chennai");
    assert_eq!(json["report"]["crop_health"]["healthy_percent"], 100.0);
    assert_eq!(json["report"]["weather_source"], "fallback");

    let txt_url = json["downloads"]["txt_url"].as_str().unwrap().to_string();
    let response = app
        .clone()
        .oneshot(Request::get(&txt_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(String::from_utf8_lossy(&bytes), json["report_text"].as_str().unwrap());

    let pdf_url = json["downloads"]["pdf_url"].as_str().unwrap().to_string();
    let response = app
        .oneshot(Request::get(&pdf_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
}

#[tokio::test]
async fn test_download_rejects_unknown_names() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.txt"), b"nope").unwrap();
    let app = app_in(dir.path()).await;

    for uri in [
        "/api/v1/advisory/reports/secret.txt",
        "/api/v1/advisory/reports/AgriSmart_Report_20240703_090507.txt",
        "/api/v1/advisory/reports/..%2Fsecret.txt",
    ] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}
