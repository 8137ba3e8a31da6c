//! Advisory recommendation models

use serde::{Deserialize, Serialize};

use super::crop::VegetationBand;

/// The fixed set of recommendations a report can carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Below 40% healthy, whatever the forecast
    SevereStress,
    /// Moderate crop with rain on the way
    ModerateAwaitRain,
    /// Moderate crop, dry forecast
    ModerateIrrigate,
    /// Healthy crop with rain on the way
    HealthyDelayIrrigation,
    /// Healthy crop, dry forecast
    HealthyRoutine,
}

impl Recommendation {
    pub const ALL: [Recommendation; 5] = [
        Recommendation::SevereStress,
        Recommendation::ModerateAwaitRain,
        Recommendation::ModerateIrrigate,
        Recommendation::HealthyDelayIrrigation,
        Recommendation::HealthyRoutine,
    ];

    /// Pick the recommendation for a healthy-crop percentage and rain flag
    pub fn for_conditions(healthy_percent: f64, rain_expected: bool) -> Self {
        Self::for_band(VegetationBand::from_percent(healthy_percent), rain_expected)
    }

    pub fn for_band(band: VegetationBand, rain_expected: bool) -> Self {
        match (band, rain_expected) {
            (VegetationBand::Stressed, _) => Recommendation::SevereStress,
            (VegetationBand::Moderate, true) => Recommendation::ModerateAwaitRain,
            (VegetationBand::Moderate, false) => Recommendation::ModerateIrrigate,
            (VegetationBand::Healthy, true) => Recommendation::HealthyDelayIrrigation,
            (VegetationBand::Healthy, false) => Recommendation::HealthyRoutine,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::SevereStress => {
                "Severe crop stress detected. Immediate irrigation & nutrient check needed."
            }
            Recommendation::ModerateAwaitRain => {
                "Rain expected soon, but crop moderate. Apply mild nutrients and wait for rain."
            }
            Recommendation::ModerateIrrigate => {
                "Moderate stress. Irrigate soon & monitor greenness with next image upload."
            }
            Recommendation::HealthyDelayIrrigation => {
                "Crops are healthy. Delay irrigation and let natural rain support growth."
            }
            Recommendation::HealthyRoutine => {
                "Excellent condition. Maintain routine irrigation & pest monitoring."
            }
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
