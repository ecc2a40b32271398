//! Position Grammar
//!
//! Classifies free-text breaker position tokens into one of four grammars:
//!
//! | Grammar         | Pattern          | Example   |
//! |-----------------|------------------|-----------|
//! | Single          | `digits`         | `7`       |
//! | Multi-pole      | `digits-digits`  | `1-3`     |
//! | Tandem half     | `digits[AB]`     | `14A`     |
//! | Combined tandem | `NA/NB` (same N) | `14A/14B` |
//!
//! Every pattern lives here; other modules match on [`PositionKind`]
//! instead of re-parsing strings.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]+$"));
static MULTI_POLE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]+)-([0-9]+)$"));
static COMBINED_TANDEM_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9]+)([AB])/([0-9]+)([AB])$"));
static TANDEM_HALF_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]+)([AB])$"));
static LEADING_SLOT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]+)"));

#[allow(clippy::disallowed_methods)] // Literal patterns, exercised by the unit tests
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("position pattern must compile")
}

pub const DESC_INVALID_RANGE: &str = "Invalid range - use consecutive positions";
pub const DESC_COMBINED_TANDEM: &str = "Tandem - creates 2 separate breakers";
pub const DESC_UNKNOWN: &str = "Invalid position format";
pub const DESC_SLOT_OUT_OF_RANGE: &str = "Slot number out of range";

// ============================================================================
// Types
// ============================================================================

/// Tandem half suffix letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TandemSuffix {
    A,
    B,
}

impl TandemSuffix {
    /// Parse a suffix letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

impl fmt::Display for TandemSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Classified shape of a position token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PositionKind {
    /// One physical slot, single-pole
    Single { slot: u32 },
    /// Contiguous run of slots bonded into one 240V breaker
    #[serde(rename = "multi")]
    MultiPole { start: u32, end: u32 },
    /// One half of a tandem pair
    TandemHalf { slot: u32, suffix: TandemSuffix },
    /// Import-time notation for two tandem halves held in one record
    CombinedTandem {
        slot: u32,
        first: TandemSuffix,
        second: TandemSuffix,
    },
    Unknown,
}

impl PositionKind {
    /// Number of poles implied by the grammar (0 for combined or unknown)
    pub fn pole_count(&self) -> u32 {
        match self {
            Self::Single { .. } | Self::TandemHalf { .. } => 1,
            Self::MultiPole { start, end } => multi_pole_count(*start, *end),
            Self::CombinedTandem { .. } | Self::Unknown => 0,
        }
    }

    /// Tandem half or combined tandem
    pub fn is_tandem(&self) -> bool {
        matches!(self, Self::TandemHalf { .. } | Self::CombinedTandem { .. })
    }

    /// Short grammar name, as used in API payloads and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single { .. } => "single",
            Self::MultiPole { .. } => "multi",
            Self::TandemHalf { .. } => "tandemHalf",
            Self::CombinedTandem { .. } => "combinedTandem",
            Self::Unknown => "unknown",
        }
    }
}

/// Result of classifying a raw position token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInfo {
    pub valid: bool,
    #[serde(flatten)]
    pub kind: PositionKind,
    pub description: String,
    /// Trimmed, upper-cased token
    pub normalized: String,
}

impl PositionInfo {
    fn new(
        valid: bool,
        kind: PositionKind,
        description: impl Into<String>,
        normalized: String,
    ) -> Self {
        Self {
            valid,
            kind,
            description: description.into(),
            normalized,
        }
    }

    fn unknown(description: &str, normalized: String) -> Self {
        Self::new(false, PositionKind::Unknown, description, normalized)
    }

    /// Convert an invalid classification into `InvalidPositionFormat`
    pub fn require_valid(self) -> Result<Self> {
        if self.valid {
            return Ok(self);
        }
        let reason = if self.description.is_empty() {
            "position cannot be empty".to_string()
        } else {
            self.description.clone()
        };
        Err(ModelError::InvalidPositionFormat {
            position: self.normalized,
            reason,
        })
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Trim and upper-case a raw position token
pub fn normalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Pole count of a `start-end` range: `ceil((end - start + 1) / 2)`, 0 when reversed
pub fn multi_pole_count(start: u32, end: u32) -> u32 {
    if end < start {
        return 0;
    }
    let span = u64::from(end) - u64::from(start) + 1;
    span.div_ceil(2).min(u64::from(u32::MAX)) as u32
}

/// Classify a raw position token
///
/// Total over all inputs: unparseable tokens come back as
/// `valid = false` rather than as an error.
///
/// # Examples
/// ```
/// use panel_model::{classify, PositionKind};
///
/// let info = classify(" 1-3 ");
/// assert!(info.valid);
/// assert_eq!(info.kind, PositionKind::MultiPole { start: 1, end: 3 });
/// assert_eq!(info.description, "2-pole breaker (240V)");
///
/// assert_eq!(classify("14a/14b").normalized, "14A/14B");
/// assert!(!classify("14A/15B").valid);
/// ```
pub fn classify(raw: &str) -> PositionInfo {
    let normalized = normalize(raw);

    if normalized.is_empty() {
        return PositionInfo::unknown("", normalized);
    }

    if SINGLE_RE.is_match(&normalized) {
        return match parse_slot(&normalized) {
            Some(slot) => {
                let description = format!("Single-pole at position {}", normalized);
                PositionInfo::new(true, PositionKind::Single { slot }, description, normalized)
            },
            None => PositionInfo::unknown(DESC_SLOT_OUT_OF_RANGE, normalized),
        };
    }

    if let Some(caps) = MULTI_POLE_RE.captures(&normalized) {
        let (Some(start), Some(end)) = (parse_slot(&caps[1]), parse_slot(&caps[2])) else {
            return PositionInfo::unknown(DESC_SLOT_OUT_OF_RANGE, normalized);
        };
        let kind = PositionKind::MultiPole { start, end };
        let poles = multi_pole_count(start, end);
        return if matches!(poles, 2 | 3) {
            let description = format!("{}-pole breaker (240V)", poles);
            PositionInfo::new(true, kind, description, normalized)
        } else {
            PositionInfo::new(false, kind, DESC_INVALID_RANGE, normalized)
        };
    }

    if let Some(caps) = COMBINED_TANDEM_RE.captures(&normalized) {
        if caps[1] == caps[3] {
            let parsed = (
                parse_slot(&caps[1]),
                suffix_of(&caps[2]),
                suffix_of(&caps[4]),
            );
            return match parsed {
                (Some(slot), Some(first), Some(second)) => PositionInfo::new(
                    true,
                    PositionKind::CombinedTandem {
                        slot,
                        first,
                        second,
                    },
                    DESC_COMBINED_TANDEM,
                    normalized,
                ),
                _ => PositionInfo::unknown(DESC_SLOT_OUT_OF_RANGE, normalized),
            };
        }
    }

    if let Some(caps) = TANDEM_HALF_RE.captures(&normalized) {
        return match (parse_slot(&caps[1]), suffix_of(&caps[2])) {
            (Some(slot), Some(suffix)) => {
                let description = format!("Tandem half at {}", normalized);
                PositionInfo::new(
                    true,
                    PositionKind::TandemHalf { slot, suffix },
                    description,
                    normalized,
                )
            },
            _ => PositionInfo::unknown(DESC_SLOT_OUT_OF_RANGE, normalized),
        };
    }

    PositionInfo::unknown(DESC_UNKNOWN, normalized)
}

/// Leading slot number of a token (`"7"` -> 7, `"5-7"` -> 5, `"X"` -> None)
pub fn leading_slot(position: &str) -> Option<u32> {
    let normalized = normalize(position);
    LEADING_SLOT_RE
        .captures(&normalized)
        .and_then(|caps| parse_slot(&caps[1]))
}

fn parse_slot(digits: &str) -> Option<u32> {
    digits.parse().ok()
}

fn suffix_of(letter: &str) -> Option<TandemSuffix> {
    letter.chars().next().and_then(TandemSuffix::from_char)
}
