//! Tandem Transformer
//!
//! Decomposes a combined tandem record (`14A/14B`) into two ordinary
//! tandem halves. The existing record becomes the first half and a new
//! sibling record carries the second. Devices wired to the original
//! record stay on the first half.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::breaker::{Breaker, BreakerId, BreakerPatch, NewBreaker};
use crate::error::{ModelError, Result};
use crate::position::{classify, compile, normalize, PositionKind, TandemSuffix};

static HALF_LABEL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\s*\([AB]\)\s*$"));

/// Records produced by splitting one combined tandem breaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TandemSplit {
    /// Rewrite of the existing record (first half)
    pub breaker_a: BreakerPatch,
    /// New sibling record (second half)
    pub breaker_b: NewBreaker,
}

/// Strip a trailing ` (A)` / ` (B)` marker from a label
///
/// Keeps re-splitting from accumulating suffixes.
pub fn base_label(label: &str) -> String {
    HALF_LABEL_SUFFIX_RE.replace(label, "").into_owned()
}

/// Label for one tandem half
///
/// An unlabelled breaker gets the bare marker (`"(A)"`), with no leading space.
pub fn half_label(base: &str, suffix: TandemSuffix) -> String {
    if base.is_empty() {
        format!("({})", suffix)
    } else {
        format!("{} ({})", base, suffix)
    }
}

/// Split a combined tandem breaker
///
/// `panel_breakers` is the panel's current breaker set; the breaker being
/// split may be included and is ignored for the occupancy check.
///
/// # Errors
/// - `NotCombinedTandem` if the position is not `{slot}{A|B}/{slot}{A|B}`
/// - `PositionOccupied` if either half position is already taken, or if
///   both halves name the same suffix
pub fn split_combined_tandem(
    breaker: &Breaker,
    panel_breakers: &[Breaker],
) -> Result<TandemSplit> {
    let info = classify(&breaker.position);
    let PositionKind::CombinedTandem { first, second, .. } = info.kind else {
        return Err(ModelError::NotCombinedTandem(breaker.position.clone()));
    };

    let slot_digits: String = info
        .normalized
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let position_a = format!("{}{}", slot_digits, first);
    let position_b = format!("{}{}", slot_digits, second);

    if first == second {
        return Err(ModelError::PositionOccupied {
            positions: vec![position_b],
        });
    }

    let occupied = occupied_positions(
        panel_breakers,
        breaker.id,
        &[position_a.as_str(), position_b.as_str()],
    );
    if !occupied.is_empty() {
        return Err(ModelError::PositionOccupied {
            positions: occupied,
        });
    }

    let base = base_label(&breaker.label);
    let mut sibling = breaker.to_new();
    sibling.position = position_b;
    sibling.label = half_label(&base, second);

    Ok(TandemSplit {
        breaker_a: BreakerPatch {
            id: breaker.id,
            position: position_a,
            label: half_label(&base, first),
        },
        breaker_b: sibling,
    })
}

/// Breakers on the panel still holding a combined tandem token
pub fn combined_tandem_breakers(breakers: &[Breaker]) -> impl Iterator<Item = &Breaker> {
    breakers.iter().filter(|b| {
        matches!(
            classify(&b.position).kind,
            PositionKind::CombinedTandem { .. }
        )
    })
}

fn occupied_positions(
    breakers: &[Breaker],
    exclude: BreakerId,
    targets: &[&str],
) -> Vec<String> {
    targets
        .iter()
        .filter(|target| {
            breakers
                .iter()
                .any(|b| b.id != exclude && normalize(&b.position) == **target)
        })
        .map(|target| target.to_string())
        .collect()
}
