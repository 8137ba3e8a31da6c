//! HTTP request handlers

pub mod advisory;
pub mod health;

pub use advisory::{create_report, download_report, get_recommendation};
pub use health::health_check;
