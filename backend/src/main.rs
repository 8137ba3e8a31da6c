//! AgriSmart Advisory - Backend Server
//!
//! Serves weather-aware crop advisories for farmers, with downloadable
//! text and PDF reports.

use agri_smart_backend::{create_app, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agri_smart_server=debug,agri_smart_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting AgriSmart Advisory Server");
    tracing::info!("Environment: {}", config.environment);
    if config.weather.api_key.trim().is_empty() {
        tracing::warn!("AGRI_WEATHER__API_KEY is not set; reports will use fallback weather");
    }
    tracing::info!("Reports directory: {}", config.report.output_dir.display());

    let addr = config.bind_address();

    // Create application state
    let state = AppState::from_config(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
