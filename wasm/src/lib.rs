//! WebAssembly module for AgriSmart Advisory
//!
//! Provides client-side previews of:
//! - Vegetation ratio of a canvas image
//! - Crop stress and health band
//! - The advisory recommendation
//! - Location input validation

use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::vegetation::{green_ratio_from_buffer, NO_IMAGE_NOTICE};

/// RGBA, as returned by `CanvasRenderingContext2D.getImageData`
const CANVAS_CHANNELS: usize = 4;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Percentage of healthy green pixels in RGBA canvas data
#[wasm_bindgen]
pub fn calculate_green_ratio(rgba: &[u8]) -> Result<f64, JsValue> {
    green_ratio_from_buffer(rgba, CANVAS_CHANNELS).map_err(to_js_error)
}

/// Vegetation ratio used when the farmer has not picked an image
#[wasm_bindgen]
pub fn default_green_ratio() -> f64 {
    web_sys::console::warn_1(&JsValue::from_str(NO_IMAGE_NOTICE));
    DEFAULT_VEGETATION_PERCENT
}

/// Stressed share of the crop for a vegetation ratio
#[wasm_bindgen]
pub fn calculate_stressed_percent(green_ratio: f64) -> f64 {
    CropHealth::from_vegetation_ratio(green_ratio).stressed_percent
}

/// Health band name ("Stressed", "Moderate" or "Healthy") for a vegetation ratio
#[wasm_bindgen]
pub fn classify_vegetation_band(green_ratio: f64) -> String {
    CropHealth::from_vegetation_ratio(green_ratio).band().to_string()
}

/// Recommendation message for a vegetation ratio and rain forecast
#[wasm_bindgen]
pub fn recommendation_message(green_ratio: f64, rain_expected: bool) -> String {
    let crop_health = CropHealth::from_vegetation_ratio(green_ratio);
    Recommendation::for_band(crop_health.band(), rain_expected)
        .message()
        .to_string()
}

#[derive(Serialize)]
struct AdvisoryPreview {
    crop_health: CropHealth,
    band: VegetationBand,
    recommendation: Recommendation,
    message: &'static str,
}

fn build_preview(green_ratio: f64, rain_expected: bool) -> AdvisoryPreview {
    let crop_health = CropHealth::from_vegetation_ratio(green_ratio);
    let band = crop_health.band();
    let recommendation = Recommendation::for_band(band, rain_expected);
    AdvisoryPreview {
        crop_health,
        band,
        recommendation,
        message: recommendation.message(),
    }
}

/// Full advisory preview as JSON
#[wasm_bindgen]
pub fn preview_advisory(green_ratio: f64, rain_expected: bool) -> Result<String, JsValue> {
    validate_percentage(green_ratio).map_err(to_js_error)?;
    serde_json::to_string(&build_preview(green_ratio, rain_expected)).map_err(to_js_error)
}

/// Check a location before submitting the report form
#[wasm_bindgen]
pub fn is_valid_location(location: &str) -> bool {
    validate_location(location).is_ok()
}
