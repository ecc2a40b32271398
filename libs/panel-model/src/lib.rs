//! Panel Model Library
//!
//! Breaker position model for PanelMap.
//! This library provides pure business logic without storage dependencies.
//!
//! # Modules
//!
//! - `position`: position token grammar and classification
//! - `conflict`: duplicate and multi-pole overlap detection
//! - `tandem`: combined tandem split into two breaker records
//! - `breaker`: breaker record, patch and update types
//! - `validation`: breaker field validation
//!
//! # Example
//!
//! ```
//! use panel_model::classify;
//!
//! let info = classify("14a");
//! assert!(info.valid);
//! assert_eq!(info.normalized, "14A");
//! assert_eq!(info.kind.name(), "tandemHalf");
//! ```

pub mod breaker;
pub mod conflict;
pub mod error;
pub mod position;
pub mod tandem;
pub mod validation;

// Re-exports for convenience
pub use breaker::{Breaker, BreakerId, BreakerPatch, BreakerUpdate, NewBreaker, PanelId};
pub use conflict::{check_conflict, slot_is_bonded_within_range, ConflictResult};
pub use error::{ModelError, Result};
pub use position::{classify, normalize, PositionInfo, PositionKind, TandemSuffix};
pub use tandem::{combined_tandem_breakers, split_combined_tandem, TandemSplit};
pub use validation::{default_poles, validate_breaker_fields, warn_on_pole_mismatch};
