//! Common types used across the advisory pipeline

use serde::{Deserialize, Serialize};

/// Round a value to one decimal place, the precision every report figure uses
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Severity of a notice shown next to the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Non-fatal message produced while generating a report
///
/// Weather fallbacks and missing uploads do not abort the pipeline; they
/// surface here instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Inclusive range a random offset is drawn from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OffsetRange {
    pub low: f64,
    pub high: f64,
}

impl OffsetRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}
