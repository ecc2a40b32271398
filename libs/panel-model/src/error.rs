//! Model Layer Error Types

use thiserror::Error;

/// Result type for panel-model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Breaker position model errors
///
/// All variants are validation outcomes: they are reported to the caller
/// and never corrected silently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Position token did not classify as a usable grammar
    #[error("Invalid position format '{position}': {reason}")]
    InvalidPositionFormat { position: String, reason: String },

    /// Another breaker on the panel already uses this exact token
    #[error("Position {position} is already in use on this panel")]
    ExactDuplicatePosition { position: String },

    /// Proposed slot is bonded by an existing multi-pole breaker
    #[error("Slot {slot} is part of the {conflicting_position} multi-pole breaker (proposed {position})")]
    MultiPoleRangeOverlap {
        position: String,
        conflicting_position: String,
        slot: u32,
    },

    /// Split requested on a breaker that is not in combined tandem form
    #[error("Position '{0}' is not a combined tandem (expected e.g. 14A/14B)")]
    NotCombinedTandem(String),

    /// Split targets are already taken on the panel
    #[error("Tandem position(s) already occupied: {}", .positions.join(", "))]
    PositionOccupied { positions: Vec<String> },

    /// Breaker field validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ModelError {
    /// Create an invalid position format error
    pub fn invalid_position(position: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPositionFormat {
            position: position.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error is a position conflict (duplicate, overlap or occupied)
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::ExactDuplicatePosition { .. }
                | Self::MultiPoleRangeOverlap { .. }
                | Self::PositionOccupied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupied_message_lists_all_positions() {
        let err = ModelError::PositionOccupied {
            positions: vec!["14A".to_string(), "14B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Tandem position(s) already occupied: 14A, 14B"
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn test_format_errors_are_not_conflicts() {
        assert!(!ModelError::invalid_position("X", "unknown format").is_conflict());
        assert!(!ModelError::NotCombinedTandem("7".to_string()).is_conflict());
    }
}
