//! Helpers shared by the integration tests

#![allow(dead_code)]

use agri_smart_backend::config::{Config, ReportConfig, WeatherConfig};
use axum::{http::StatusCode, routing::get, Router};
use std::path::Path;

/// One OpenWeatherMap forecast entry
pub fn forecast_entry(temp: f64, humidity: f64, wind: f64, category: &str) -> String {
    format!(
        r#"{{"dt":1700000000,"main":{{"temp":{},"humidity":{}}},"weather":[{{"main":"{}"}}],"wind":{{"speed":{}}}}}"#,
        temp, humidity, category, wind
    )
}

pub fn forecast_body(entries: &[String]) -> String {
    format!(r#"{{"cod":"200","cnt":{},"list":[{}]}}"#, entries.len(), entries.join(","))
}

/// Serve a fixed `/forecast` response on an ephemeral local port; returns the base URL
pub async fn spawn_forecast_stub(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/forecast",
        get(move || {
            let body = body.clone();
            async move { (status, body) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn test_config(base_url: &str, output_dir: &Path) -> Config {
    Config {
        weather: WeatherConfig {
            api_endpoint: base_url.to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
        },
        report: ReportConfig {
            output_dir: output_dir.to_path_buf(),
            region_suffix: Some("Tamil Nadu".to_string()),
        },
        ..Config::default()
    }
}

/// Artifact files currently in a report directory, sorted
pub fn artifact_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
