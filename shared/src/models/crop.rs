//! Crop health models

use serde::{Deserialize, Serialize};

use crate::types::round_to_tenth;

/// Vegetation ratio assumed when no crop image is supplied
pub const DEFAULT_VEGETATION_PERCENT: f64 = 50.0;

/// Healthy/stressed split of the analysed crop area
///
/// Only the vegetation ratio is ever supplied; the stressed share is derived
/// from it so the two always add up to 100 (within rounding).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CropHealth {
    pub healthy_percent: f64,
    pub stressed_percent: f64,
}

impl CropHealth {
    /// Build from a raw vegetation ratio, clamped to 0-100
    pub fn from_vegetation_ratio(ratio: f64) -> Self {
        let ratio = ratio.clamp(0.0, 100.0);
        Self {
            healthy_percent: round_to_tenth(ratio),
            stressed_percent: round_to_tenth(100.0 - ratio),
        }
    }

    pub fn band(&self) -> VegetationBand {
        VegetationBand::from_percent(self.healthy_percent)
    }
}

/// Vegetation-ratio band driving both weather adjustment and advice
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VegetationBand {
    /// Below 40% healthy
    Stressed,
    /// 40% up to (not including) 70%
    Moderate,
    /// 70% and above
    Healthy,
}

impl VegetationBand {
    pub const MODERATE_FLOOR: f64 = 40.0;
    pub const HEALTHY_FLOOR: f64 = 70.0;

    pub fn from_percent(healthy_percent: f64) -> Self {
        if healthy_percent < Self::MODERATE_FLOOR {
            VegetationBand::Stressed
        } else if healthy_percent < Self::HEALTHY_FLOOR {
            VegetationBand::Moderate
        } else {
            VegetationBand::Healthy
        }
    }
}

impl std::fmt::Display for VegetationBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VegetationBand::Stressed => write!(f, "Stressed"),
            VegetationBand::Moderate => write!(f, "Moderate"),
            VegetationBand::Healthy => write!(f, "Healthy"),
        }
    }
}
