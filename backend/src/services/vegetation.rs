//! Vegetation service: decodes crop uploads and measures healthy green area

use image::{ImageReader, RgbImage};
use serde::Serialize;
use shared::{green_ratio, VegetationAnalysis, VegetationError};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};

/// Vegetation analysis of an uploaded crop image
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub analysis: VegetationAnalysis,
    /// Decoded image, kept for display
    pub image: RgbImage,
}

/// Display details of an analysed upload
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub width: u32,
    pub height: u32,
    pub caption: String,
}

impl ImageAnalysis {
    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            width: self.image.width(),
            height: self.image.height(),
            caption: self.analysis.caption(),
        }
    }
}

/// Vegetation service
#[derive(Clone, Default)]
pub struct VegetationService;

impl VegetationService {
    pub fn new() -> Self {
        Self
    }

    /// Analyse an uploaded JPEG/PNG
    ///
    /// The upload is spooled to a temporary file that is removed when this
    /// returns, whichever path it takes. Empty, undecodable and zero-pixel
    /// uploads are rejected as [`AppError::InvalidImage`].
    pub fn analyze_upload(&self, bytes: &[u8]) -> AppResult<ImageAnalysis> {
        if bytes.is_empty() {
            return Err(AppError::InvalidImage("uploaded file is empty".to_string()));
        }

        let mut spool = NamedTempFile::new()
            .map_err(|e| AppError::Internal(format!("Failed to create temporary file: {}", e)))?;
        spool
            .write_all(bytes)
            .and_then(|_| spool.flush())
            .map_err(|e| AppError::Internal(format!("Failed to spool upload: {}", e)))?;

        let image = ImageReader::open(spool.path())
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| AppError::InvalidImage(e.to_string()))?
            .decode()
            .map_err(|e| AppError::InvalidImage(e.to_string()))?
            .to_rgb8();

        let ratio = green_ratio(image.pixels().map(|p| p.0)).map_err(|e| match e {
            VegetationError::EmptyImage => AppError::InvalidImage("image has no pixels".to_string()),
            other => AppError::InvalidImage(other.to_string()),
        })?;

        tracing::info!(
            width = image.width(),
            height = image.height(),
            green_ratio = ratio,
            "Crop image analysed"
        );

        Ok(ImageAnalysis {
            analysis: VegetationAnalysis::measured(ratio),
            image,
        })
    }
}
