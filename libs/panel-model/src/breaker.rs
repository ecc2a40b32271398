//! Breaker record types
//!
//! - Breaker: a persisted breaker as read from the store
//! - NewBreaker: fields for a record the store has not assigned an id to yet
//! - BreakerPatch: position/label rewrite produced by a tandem split
//! - BreakerUpdate: partial update coming from the API boundary

use serde::{Deserialize, Serialize};

use crate::position::normalize;

/// Store-assigned breaker identifier
pub type BreakerId = i64;

/// Owning panel identifier; scopes all position checks
pub type PanelId = i64;

pub const DEFAULT_CIRCUIT_TYPE: &str = "general";
pub const DEFAULT_PROTECTION_TYPE: &str = "standard";

// ============================================================================
// Breaker
// ============================================================================

/// Persisted breaker record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breaker {
    pub id: BreakerId,
    pub panel_id: PanelId,
    /// Normalized position token
    pub position: String,
    pub amperage: u32,
    /// 1-3, expected to agree with the position grammar
    pub poles: u8,
    pub label: String,
    pub circuit_type: String,
    pub protection_type: String,
    pub is_on: bool,
    pub notes: Option<String>,
    pub sort_order: i64,
}

impl Breaker {
    /// Copy of this breaker's fields without the id
    pub fn to_new(&self) -> NewBreaker {
        NewBreaker {
            panel_id: self.panel_id,
            position: self.position.clone(),
            amperage: self.amperage,
            poles: self.poles,
            label: self.label.clone(),
            circuit_type: self.circuit_type.clone(),
            protection_type: self.protection_type.clone(),
            is_on: self.is_on,
            notes: self.notes.clone(),
            sort_order: self.sort_order,
        }
    }
}

// ============================================================================
// New records and patches
// ============================================================================

/// Breaker fields prior to insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBreaker {
    pub panel_id: PanelId,
    pub position: String,
    pub amperage: u32,
    pub poles: u8,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_circuit_type")]
    pub circuit_type: String,
    #[serde(default = "default_protection_type")]
    pub protection_type: String,
    #[serde(default = "default_is_on")]
    pub is_on: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl NewBreaker {
    /// Same record with its position trimmed and upper-cased
    pub fn normalized(mut self) -> Self {
        self.position = normalize(&self.position);
        self
    }
}

/// Position/label rewrite applied to an existing record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakerPatch {
    pub id: BreakerId,
    pub position: String,
    pub label: String,
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakerUpdate {
    pub position: Option<String>,
    pub amperage: Option<u32>,
    pub poles: Option<u8>,
    pub label: Option<String>,
    pub circuit_type: Option<String>,
    pub protection_type: Option<String>,
    pub is_on: Option<bool>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
    pub sort_order: Option<i64>,
}

impl BreakerUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the update on top of an existing record
    pub fn apply_to(&self, breaker: &Breaker) -> Breaker {
        let mut updated = breaker.clone();
        if let Some(position) = &self.position {
            updated.position = normalize(position);
        }
        if let Some(amperage) = self.amperage {
            updated.amperage = amperage;
        }
        if let Some(poles) = self.poles {
            updated.poles = poles;
        }
        if let Some(label) = &self.label {
            updated.label = label.clone();
        }
        if let Some(circuit_type) = &self.circuit_type {
            updated.circuit_type = circuit_type.clone();
        }
        if let Some(protection_type) = &self.protection_type {
            updated.protection_type = protection_type.clone();
        }
        if let Some(is_on) = self.is_on {
            updated.is_on = is_on;
        }
        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }
        if let Some(sort_order) = self.sort_order {
            updated.sort_order = sort_order;
        }
        updated
    }
}

fn default_circuit_type() -> String {
    DEFAULT_CIRCUIT_TYPE.to_string()
}

fn default_protection_type() -> String {
    DEFAULT_PROTECTION_TYPE.to_string()
}

fn default_is_on() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn sample() -> Breaker {
        Breaker {
            id: 3,
            panel_id: 1,
            position: "7".to_string(),
            amperage: 20,
            poles: 1,
            label: "Garage".to_string(),
            circuit_type: "outlet".to_string(),
            protection_type: "gfci".to_string(),
            is_on: true,
            notes: Some("near door".to_string()),
            sort_order: 4,
        }
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let update = BreakerUpdate {
            position: Some(" 9 ".to_string()),
            notes: Some(None),
            ..Default::default()
        };
        let updated = update.apply_to(&sample());
        assert_eq!(updated.position, "9");
        assert_eq!(updated.notes, None);
        assert_eq!(updated.label, "Garage");
        assert_eq!(updated.amperage, 20);
        assert!(!update.is_empty());
        assert!(BreakerUpdate::default().is_empty());
    }

    #[test]
    fn test_new_breaker_json_defaults() {
        let json = r#"{"panelId": 2, "position": "14a/14b", "amperage": 15, "poles": 1}"#;
        let new: NewBreaker = serde_json::from_str(json).unwrap();
        assert_eq!(new.circuit_type, DEFAULT_CIRCUIT_TYPE);
        assert_eq!(new.protection_type, DEFAULT_PROTECTION_TYPE);
        assert!(new.is_on);
        assert_eq!(new.label, "");
        assert_eq!(new.normalized().position, "14A/14B");
    }

    #[test]
    fn test_to_new_keeps_fields() {
        let new = sample().to_new();
        assert_eq!(new.panel_id, 1);
        assert_eq!(new.protection_type, "gfci");
        assert_eq!(new.sort_order, 4);
    }
}
