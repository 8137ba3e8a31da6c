//! Validation utilities for advisory inputs

/// Longest location name accepted by the forecast lookup
pub const MAX_LOCATION_LENGTH: usize = 100;

/// Validate a user-supplied place name
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err("Location is required");
    }
    if trimmed.chars().count() > MAX_LOCATION_LENGTH {
        return Err("Location must be at most 100 characters");
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err("Location must not contain control characters");
    }
    Ok(())
}

/// Validate a percentage is within 0-100
pub fn validate_percentage(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}
