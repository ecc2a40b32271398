//! Property tests for position classification and slot bonding

use panel_model::position::multi_pole_count;
use panel_model::{classify, normalize, slot_is_bonded_within_range, PositionKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn digit_strings_classify_as_single(digits in "[0-9]{1,9}", pad in " {0,2}") {
        let slot: u32 = digits.parse().unwrap_or_default();
        let info = classify(&format!("{pad}{digits}{pad}"));

        prop_assert!(info.valid);
        prop_assert_eq!(info.kind, PositionKind::Single { slot });
        prop_assert_eq!(info.kind.pole_count(), 1);
        prop_assert_eq!(info.normalized, digits);
    }

    #[test]
    fn any_u32_slot_is_single(slot in any::<u32>()) {
        let info = classify(&slot.to_string());
        prop_assert!(info.valid);
        prop_assert_eq!(info.kind, PositionKind::Single { slot });
    }

    #[test]
    fn range_pole_formula(start in 0u32..10_000, end in 0u32..10_000) {
        let info = classify(&format!("{start}-{end}"));
        let expected = if end < start { 0 } else { (end - start + 2) / 2 };

        prop_assert_eq!(info.kind, PositionKind::MultiPole { start, end });
        prop_assert_eq!(multi_pole_count(start, end), expected);
        prop_assert_eq!(info.kind.pole_count(), expected);
        prop_assert_eq!(info.valid, expected == 2 || expected == 3);
    }

    #[test]
    fn short_ranges_follow_pole_formula(start in 0u32..1_000, span in 1u32..8) {
        let end = start + span;
        let info = classify(&format!("{start}-{end}"));
        let poles = (span + 2) / 2;

        prop_assert_eq!(info.kind.pole_count(), poles);
        prop_assert_eq!(info.valid, poles == 2 || poles == 3);
    }

    #[test]
    fn classify_is_total_and_idempotent(raw in any::<String>()) {
        let first = classify(&raw);
        let second = classify(&first.normalized);

        prop_assert_eq!(normalize(&first.normalized), first.normalized.clone());
        prop_assert_eq!(second, first);
    }

    #[test]
    fn classify_is_idempotent_on_position_like_text(raw in "[ 0-9abAB/\\-]{0,12}") {
        let first = classify(&raw);
        prop_assert_eq!(classify(&first.normalized), first);
    }

    #[test]
    fn bonded_slots_match_step_scan(start in 0u32..500, end in 0u32..500, slot in 0u32..600) {
        let scanned = (start..=end).step_by(2).any(|s| s == slot);
        prop_assert_eq!(slot_is_bonded_within_range(slot, start, end), scanned);
    }
}
