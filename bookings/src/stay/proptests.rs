//! Property-based tests for `StayRange`.

use super::StayRange;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// Anchor all generated stays around a fixed day so offsets stay readable.
fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2050, 1, 1).unwrap() + Duration::days(offset)
}

// Strategy for generating valid stays: start offset plus 1..=30 nights.
fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (0i64..365, 1i64..=30).prop_map(|(start, nights)| {
        StayRange::new(day(start), day(start + nights)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5000,
        max_shrink_iters: 5000,
        .. ProptestConfig::default()
    })]

    // Overlap is symmetric
    #[test]
    fn overlap_is_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Every stay overlaps itself
    #[test]
    fn overlap_is_reflexive(a in stay_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    // A stay starting on another's check-out day never overlaps it
    #[test]
    fn adjacent_stays_never_overlap(a in stay_strategy(), nights in 1i64..=30) {
        let next = StayRange::new(a.end(), a.end() + Duration::days(nights)).unwrap();
        prop_assert!(!a.overlaps(&next));
        prop_assert!(!next.overlaps(&a));
    }

    // Overlap agrees with "some night falls in both"
    #[test]
    fn overlap_matches_shared_night(a in stay_strategy(), b in stay_strategy()) {
        let shared = (0..a.nights())
            .map(|n| a.start() + Duration::days(n))
            .any(|night| b.start() <= night && night < b.end());
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    // Empty and inverted ranges are always rejected
    #[test]
    fn non_positive_ranges_rejected(start in 0i64..365, back in 0i64..30) {
        prop_assert!(StayRange::new(day(start), day(start - back)).is_err());
    }
}
