//! Conflict Resolver
//!
//! Decides whether a proposed position collides with the breakers already
//! on a panel. Pure: the caller supplies the panel's current breaker set.

use serde::{Deserialize, Serialize};

use crate::breaker::{Breaker, BreakerId};
use crate::error::{ModelError, Result};
use crate::position::{classify, leading_slot, normalize, PositionKind};

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum ConflictResult {
    Ok,
    /// Another breaker uses the identical token
    #[serde(rename_all = "camelCase")]
    ExactDuplicate { position: String },
    /// Proposed slot is bonded by an existing multi-pole range
    #[serde(rename_all = "camelCase")]
    RangeOverlap {
        conflicting_position: String,
        conflicting_slot: u32,
    },
}

impl ConflictResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Map a conflict onto the matching [`ModelError`]
    ///
    /// `proposed` is the position that was checked, used in the overlap message.
    pub fn into_result(self, proposed: &str) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::ExactDuplicate { position } => {
                Err(ModelError::ExactDuplicatePosition { position })
            },
            Self::RangeOverlap {
                conflicting_position,
                conflicting_slot,
            } => Err(ModelError::MultiPoleRangeOverlap {
                position: normalize(proposed),
                conflicting_position,
                slot: conflicting_slot,
            }),
        }
    }
}

/// Whether `slot` is one of the slots a `start-end` breaker bonds
///
/// North American panels stack odd and even slots in two columns, so a
/// 240V breaker starting at `start` occupies `start, start+2, ...` up to
/// `end`.
pub fn slot_is_bonded_within_range(slot: u32, start: u32, end: u32) -> bool {
    slot >= start && slot <= end && (slot - start) % 2 == 0
}

/// Check a proposed position against a panel's breakers
///
/// Rules, in order:
/// 1. identical normalized token on another breaker -> `ExactDuplicate`
/// 2. for non-tandem tokens, the leading slot falls on a slot bonded by an
///    existing multi-pole range -> `RangeOverlap`
/// 3. otherwise `Ok`
///
/// `exclude` skips the breaker being moved.
///
/// # Examples
/// ```
/// use panel_model::{check_conflict, ConflictResult};
/// # use panel_model::Breaker;
/// # fn at(id: i64, position: &str) -> Breaker {
/// #     Breaker { id, panel_id: 1, position: position.into(), amperage: 20, poles: 1,
/// #         label: String::new(), circuit_type: "general".into(),
/// #         protection_type: "standard".into(), is_on: true, notes: None, sort_order: 0 }
/// # }
/// let panel = vec![at(1, "7"), at(2, "1-3")];
/// assert!(matches!(check_conflict(&panel, "7", None), ConflictResult::ExactDuplicate { .. }));
/// assert!(matches!(check_conflict(&panel, "1", None), ConflictResult::RangeOverlap { .. }));
/// assert_eq!(check_conflict(&panel, "2", None), ConflictResult::Ok);
/// ```
pub fn check_conflict(
    breakers: &[Breaker],
    proposed: &str,
    exclude: Option<BreakerId>,
) -> ConflictResult {
    let proposed = normalize(proposed);
    let others = || breakers.iter().filter(move |b| Some(b.id) != exclude);

    if let Some(existing) = others().find(|b| normalize(&b.position) == proposed) {
        return ConflictResult::ExactDuplicate {
            position: normalize(&existing.position),
        };
    }

    // Tandem tokens skip the range scan; see DESIGN.md
    if classify(&proposed).kind.is_tandem() {
        return ConflictResult::Ok;
    }
    let Some(slot) = leading_slot(&proposed) else {
        return ConflictResult::Ok;
    };

    for existing in others() {
        let info = classify(&existing.position);
        if let PositionKind::MultiPole { start, end } = info.kind {
            if slot_is_bonded_within_range(slot, start, end) {
                return ConflictResult::RangeOverlap {
                    conflicting_position: info.normalized,
                    conflicting_slot: slot,
                };
            }
        }
    }

    ConflictResult::Ok
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn breaker(id: BreakerId, position: &str) -> Breaker {
        Breaker {
            id,
            panel_id: 1,
            position: position.to_string(),
            amperage: 20,
            poles: 1,
            label: format!("Circuit {id}"),
            circuit_type: "general".to_string(),
            protection_type: "standard".to_string(),
            is_on: true,
            notes: None,
            sort_order: id,
        }
    }

    fn panel() -> Vec<Breaker> {
        vec![breaker(1, "7"), breaker(2, "1-3")]
    }

    #[test]
    fn test_exact_duplicate() {
        assert_eq!(
            check_conflict(&panel(), "7", None),
            ConflictResult::ExactDuplicate {
                position: "7".to_string()
            }
        );
        assert_eq!(
            check_conflict(&panel(), " 1-3 ", None),
            ConflictResult::ExactDuplicate {
                position: "1-3".to_string()
            }
        );
    }

    #[test]
    fn test_range_overlap_follows_parity() {
        assert_eq!(
            check_conflict(&panel(), "1", None),
            ConflictResult::RangeOverlap {
                conflicting_position: "1-3".to_string(),
                conflicting_slot: 1,
            }
        );
        assert_eq!(
            check_conflict(&panel(), "3", None),
            ConflictResult::RangeOverlap {
                conflicting_position: "1-3".to_string(),
                conflicting_slot: 3,
            }
        );
        // Even partner slot is not bonded by an odd-start range
        assert_eq!(check_conflict(&panel(), "2", None), ConflictResult::Ok);
        assert_eq!(check_conflict(&panel(), "9", None), ConflictResult::Ok);
    }

    #[test]
    fn test_multi_pole_proposal_checks_leading_slot_only() {
        assert!(matches!(
            check_conflict(&panel(), "3-5", None),
            ConflictResult::RangeOverlap {
                conflicting_slot: 3,
                ..
            }
        ));
        assert_eq!(check_conflict(&panel(), "2-4", None), ConflictResult::Ok);
    }

    #[test]
    fn test_tandem_halves_with_different_suffix_coexist() {
        let panel = vec![breaker(1, "14A")];
        assert_eq!(check_conflict(&panel, "14B", None), ConflictResult::Ok);
        assert_eq!(
            check_conflict(&panel, "14a", None),
            ConflictResult::ExactDuplicate {
                position: "14A".to_string()
            }
        );
    }

    #[test]
    fn test_tandem_inside_bonded_range_is_accepted() {
        // Current behavior: tandem forms skip the range scan
        let panel = vec![breaker(1, "1-3")];
        assert_eq!(check_conflict(&panel, "1A", None), ConflictResult::Ok);
        assert_eq!(check_conflict(&panel, "3A/3B", None), ConflictResult::Ok);
    }

    #[test]
    fn test_combined_token_not_matched_against_existing_halves() {
        // Current behavior: only exact token equality is checked for combined tokens
        let panel = vec![breaker(1, "14A")];
        assert_eq!(check_conflict(&panel, "14A/14B", None), ConflictResult::Ok);
    }

    #[test]
    fn test_exclude_own_breaker() {
        assert_eq!(check_conflict(&panel(), "7", Some(1)), ConflictResult::Ok);
        // Moving the range itself onto one of its own slots
        assert_eq!(check_conflict(&panel(), "1", Some(2)), ConflictResult::Ok);
    }

    #[test]
    fn test_existing_invalid_range_still_bonds() {
        let panel = vec![breaker(1, "1-7")];
        assert!(!check_conflict(&panel, "5", None).is_ok());
        assert!(check_conflict(&panel, "6", None).is_ok());
    }

    #[test]
    fn test_unparseable_proposal_only_checks_duplicates() {
        assert_eq!(check_conflict(&panel(), "X", None), ConflictResult::Ok);
        assert_eq!(check_conflict(&panel(), "", None), ConflictResult::Ok);
    }

    #[test]
    fn test_slot_is_bonded_within_range() {
        assert!(slot_is_bonded_within_range(2, 2, 6));
        assert!(slot_is_bonded_within_range(4, 2, 6));
        assert!(slot_is_bonded_within_range(6, 2, 6));
        assert!(!slot_is_bonded_within_range(3, 2, 6));
        assert!(!slot_is_bonded_within_range(8, 2, 6));
        assert!(!slot_is_bonded_within_range(0, 2, 6));
        assert!(!slot_is_bonded_within_range(2, 6, 2));
    }

    #[test]
    fn test_into_result() {
        assert!(ConflictResult::Ok.into_result("9").is_ok());
        let err = check_conflict(&panel(), "1", None)
            .into_result("1")
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::MultiPoleRangeOverlap {
                position: "1".to_string(),
                conflicting_position: "1-3".to_string(),
                slot: 1,
            }
        );
    }
}
