//! AgriSmart advisory server
//!
//! Combines a city's weather forecast with a crop image to produce a
//! farming recommendation, delivered as text and PDF reports.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult};

use external::WeatherClient;
use services::{AdvisoryService, ReportingService, VegetationService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisory: AdvisoryService,
    pub reporting: ReportingService,
}

impl AppState {
    /// Wire up the services described by a configuration
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let weather_client = WeatherClient::with_timeout(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
            Duration::from_secs(config.weather.timeout_secs),
        )?;
        let reporting = ReportingService::new(config.report.output_dir.clone());
        let advisory = AdvisoryService::new(
            WeatherService::new(weather_client),
            VegetationService::new(),
            reporting.clone(),
            config.report.region_suffix.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            advisory,
            reporting,
        })
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Multipart framing needs a little room on top of the image itself
    let body_limit = state.config.upload.max_image_bytes + 64 * 1024;

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgriSmart Advisory API v1.0"
}
