//! Crop-stress weather adjustment
//!
//! Fetched readings are nudged by random offsets whose ranges depend on the
//! vegetation band. The random source is injected through [`OffsetSampler`]
//! so callers can seed it or pin it.

use rand::Rng;

use crate::models::{VegetationBand, WeatherReading};
use crate::types::{round_to_tenth, OffsetRange};

/// Offset ranges applied for one vegetation band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandOffsets {
    pub temperature: OffsetRange,
    pub humidity: OffsetRange,
    /// Wind is only adjusted for stressed crops
    pub wind: Option<OffsetRange>,
}

impl BandOffsets {
    pub const STRESSED: BandOffsets = BandOffsets {
        temperature: OffsetRange::new(1.0, 2.5),
        humidity: OffsetRange::new(-10.0, -5.0),
        wind: Some(OffsetRange::new(1.0, 2.0)),
    };

    pub const MODERATE: BandOffsets = BandOffsets {
        temperature: OffsetRange::new(-0.5, 1.0),
        humidity: OffsetRange::new(-2.0, 3.0),
        wind: None,
    };

    pub const HEALTHY: BandOffsets = BandOffsets {
        temperature: OffsetRange::new(-1.5, 0.5),
        humidity: OffsetRange::new(3.0, 6.0),
        wind: None,
    };

    pub fn for_band(band: VegetationBand) -> Self {
        match band {
            VegetationBand::Stressed => Self::STRESSED,
            VegetationBand::Moderate => Self::MODERATE,
            VegetationBand::Healthy => Self::HEALTHY,
        }
    }
}

/// Source of offsets drawn from a range
pub trait OffsetSampler {
    fn sample(&mut self, range: OffsetRange) -> f64;
}

/// Draws offsets uniformly from the range using any `rand` generator
pub struct RngSampler<R> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> OffsetSampler for RngSampler<R> {
    fn sample(&mut self, range: OffsetRange) -> f64 {
        self.rng.gen_range(range.low..=range.high)
    }
}

/// Always returns the same position within each range
///
/// `fraction` 0.0 yields the low bound, 1.0 the high bound.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler {
    fraction: f64,
}

impl FixedSampler {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn midpoint() -> Self {
        Self::new(0.5)
    }
}

impl OffsetSampler for FixedSampler {
    fn sample(&mut self, range: OffsetRange) -> f64 {
        range.low + (range.high - range.low) * self.fraction
    }
}

/// Apply the band's offsets to a reading
///
/// Offsets are sampled in temperature, humidity, wind order. Results are
/// rounded to one decimal place; the rain flag is untouched.
pub fn adjust_weather<S>(reading: WeatherReading, band: VegetationBand, sampler: &mut S) -> WeatherReading
where
    S: OffsetSampler + ?Sized,
{
    let offsets = BandOffsets::for_band(band);

    let temperature = reading.temperature_celsius + sampler.sample(offsets.temperature);
    let humidity = reading.humidity_percent + sampler.sample(offsets.humidity);
    let wind = match offsets.wind {
        Some(range) => reading.wind_speed_kmh + sampler.sample(range),
        None => reading.wind_speed_kmh,
    };

    WeatherReading {
        temperature_celsius: round_to_tenth(temperature),
        humidity_percent: round_to_tenth(humidity),
        wind_speed_kmh: round_to_tenth(wind),
        rain_expected: reading.rain_expected,
    }
}
