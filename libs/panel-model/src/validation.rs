//! Validation Utilities
//!
//! Pure validation logic for breaker fields.
//! No database or IO dependencies.

use tracing::warn;

use crate::error::{ModelError, Result};
use crate::position::PositionInfo;

pub const MAX_POLES: u8 = 3;
pub const MAX_AMPERAGE: u32 = 400;
pub const MAX_LABEL_LEN: usize = 128;

/// Validate the non-position breaker fields
///
/// Rules:
/// - Poles: 1-3
/// - Amperage: 1-400
/// - Label: at most 128 characters
///
/// # Examples
/// ```
/// use panel_model::validate_breaker_fields;
///
/// assert!(validate_breaker_fields(20, 1, "Kitchen").is_ok());
/// assert!(validate_breaker_fields(0, 1, "Kitchen").is_err());
/// assert!(validate_breaker_fields(20, 4, "Kitchen").is_err());
/// ```
pub fn validate_breaker_fields(amperage: u32, poles: u8, label: &str) -> Result<()> {
    if poles == 0 || poles > MAX_POLES {
        return Err(ModelError::Validation(format!(
            "Poles must be between 1 and {} (got {})",
            MAX_POLES, poles
        )));
    }

    if amperage == 0 || amperage > MAX_AMPERAGE {
        return Err(ModelError::Validation(format!(
            "Amperage must be between 1 and {} (got {})",
            MAX_AMPERAGE, amperage
        )));
    }

    let label_len = label.chars().count();
    if label_len > MAX_LABEL_LEN {
        return Err(ModelError::Validation(format!(
            "Label too long ({} characters). Maximum length is {} characters.",
            label_len, MAX_LABEL_LEN
        )));
    }

    Ok(())
}

/// Default pole count for a position: the grammar's count, or 1
pub fn default_poles(info: &PositionInfo) -> u8 {
    match info.kind.pole_count() {
        0 => 1,
        n => n.min(u32::from(MAX_POLES)) as u8,
    }
}

/// Pole count the grammar implies when `poles` disagrees with it
///
/// Combined tandems and unknown tokens carry no pole count and never
/// disagree.
fn pole_mismatch(poles: u8, info: &PositionInfo) -> Option<u32> {
    let expected = info.kind.pole_count();
    if expected == 0 || expected == u32::from(poles) {
        None
    } else {
        Some(expected)
    }
}

/// Log a warning when `poles` disagrees with the position grammar
///
/// Disagreement is reported, not rejected.
pub fn warn_on_pole_mismatch(poles: u8, info: &PositionInfo) {
    if let Some(expected) = pole_mismatch(poles, info) {
        warn!(
            "Breaker at {} declares {} pole(s), position implies {}",
            info.normalized, poles, expected
        );
    }
}
