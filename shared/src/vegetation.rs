//! Healthy-vegetation estimation from RGB pixels
//!
//! A pixel counts as healthy crop when its colour falls inside a green
//! hue/saturation/value window. HSV uses the common 8-bit convention:
//! hue is degrees / 2 (0-179), saturation and value are 0-255.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DEFAULT_VEGETATION_PERCENT;
use crate::types::Notice;

pub const GREEN_HUE_MIN: u8 = 36;
pub const GREEN_HUE_MAX: u8 = 86;
pub const GREEN_SATURATION_MIN: u8 = 25;
pub const GREEN_VALUE_MIN: u8 = 25;

pub const NO_IMAGE_NOTICE: &str = "No image uploaded. Assuming 50% healthy crop.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VegetationError {
    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Pixel buffer length {len} is not a multiple of {channels}")]
    MisalignedBuffer { len: usize, channels: usize },
}

/// 8-bit HSV colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

impl Hsv {
    pub fn is_healthy_green(&self) -> bool {
        (GREEN_HUE_MIN..=GREEN_HUE_MAX).contains(&self.hue)
            && self.saturation >= GREEN_SATURATION_MIN
            && self.value >= GREEN_VALUE_MIN
    }
}

/// Convert an RGB pixel to 8-bit HSV
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let saturation = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

    let mut hue_degrees = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if hue_degrees < 0.0 {
        hue_degrees += 360.0;
    }

    // 360 degrees wraps to hue 0 after halving and rounding
    let hue = ((hue_degrees / 2.0).round() as u16 % 180) as u8;

    Hsv {
        hue,
        saturation: saturation.round().min(255.0) as u8,
        value: max as u8,
    }
}

pub fn is_healthy_pixel(pixel: [u8; 3]) -> bool {
    rgb_to_hsv(pixel).is_healthy_green()
}

/// Percentage (0-100) of pixels classified as healthy crop
pub fn green_ratio<I>(pixels: I) -> Result<f64, VegetationError>
where
    I: IntoIterator<Item = [u8; 3]>,
{
    let mut total = 0usize;
    let mut matched = 0usize;
    for pixel in pixels {
        total += 1;
        if is_healthy_pixel(pixel) {
            matched += 1;
        }
    }

    if total == 0 {
        return Err(VegetationError::EmptyImage);
    }

    Ok(100.0 * matched as f64 / total as f64)
}

/// Green ratio over an interleaved buffer with `channels` bytes per pixel
///
/// Only the first three channels are read, so RGB and RGBA buffers both work.
pub fn green_ratio_from_buffer(buffer: &[u8], channels: usize) -> Result<f64, VegetationError> {
    if channels < 3 || buffer.len() % channels != 0 {
        return Err(VegetationError::MisalignedBuffer {
            len: buffer.len(),
            channels,
        });
    }
    green_ratio(buffer.chunks_exact(channels).map(|px| [px[0], px[1], px[2]]))
}

/// Result of the vegetation step of the pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VegetationAnalysis {
    /// Unrounded healthy percentage
    pub green_ratio: f64,
    pub image_supplied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl VegetationAnalysis {
    pub fn measured(green_ratio: f64) -> Self {
        Self {
            green_ratio,
            image_supplied: true,
            notice: None,
        }
    }

    /// Used when no crop image was supplied
    pub fn absent() -> Self {
        Self {
            green_ratio: DEFAULT_VEGETATION_PERCENT,
            image_supplied: false,
            notice: Some(Notice::warning(NO_IMAGE_NOTICE)),
        }
    }

    /// Display caption, e.g. "Crop Analysis: 42.17% Green"
    pub fn caption(&self) -> String {
        format!("Crop Analysis: {:.2}% Green", self.green_ratio)
    }
}
