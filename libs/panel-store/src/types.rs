//! Store-level record and result types

use panel_model::breaker::{DEFAULT_CIRCUIT_TYPE, DEFAULT_PROTECTION_TYPE};
use panel_model::{Breaker, BreakerId, NewBreaker, PanelId, PositionInfo};
use serde::{Deserialize, Serialize};

/// Electrical panel; scopes breaker positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub id: PanelId,
    pub name: String,
}

/// Device wired to at most one breaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub panel_id: PanelId,
    pub name: String,
    pub room: Option<String>,
    pub breaker_id: Option<BreakerId>,
}

/// Create request as received from the API boundary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBreakerRequest {
    pub position: String,
    pub amperage: u32,
    /// Defaults to the pole count implied by the position
    #[serde(default)]
    pub poles: Option<u8>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub circuit_type: Option<String>,
    #[serde(default)]
    pub protection_type: Option<String>,
    #[serde(default)]
    pub is_on: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

impl NewBreakerRequest {
    /// Build the insert record from an already classified position
    pub(crate) fn into_new_breaker(
        self,
        panel_id: PanelId,
        info: &PositionInfo,
        poles: u8,
    ) -> NewBreaker {
        NewBreaker {
            panel_id,
            position: info.normalized.clone(),
            amperage: self.amperage,
            poles,
            label: self.label,
            circuit_type: self
                .circuit_type
                .unwrap_or_else(|| DEFAULT_CIRCUIT_TYPE.to_string()),
            protection_type: self
                .protection_type
                .unwrap_or_else(|| DEFAULT_PROTECTION_TYPE.to_string()),
            is_on: self.is_on.unwrap_or(true),
            notes: self.notes,
            sort_order: self.sort_order.unwrap_or(0),
        }
    }
}

/// Records written by a create, update or split
///
/// `sibling` is set when a combined tandem token was split into two halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerWrite {
    pub breaker: Breaker,
    pub sibling: Option<Breaker>,
}

impl BreakerWrite {
    pub fn single(breaker: Breaker) -> Self {
        Self {
            breaker,
            sibling: None,
        }
    }

    /// All written records, first half first
    pub fn records(&self) -> Vec<&Breaker> {
        std::iter::once(&self.breaker)
            .chain(self.sibling.as_ref())
            .collect()
    }
}

/// Combined tandem left in place by a migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSplit {
    pub breaker_id: BreakerId,
    pub position: String,
    pub reason: String,
}

/// Outcome of a panel-wide combined tandem migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub panel_id: PanelId,
    pub migrated: usize,
    pub skipped: Vec<SkippedSplit>,
}
