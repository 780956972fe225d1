//! Property tests for date-range iteration and file naming.
//!
//! Uses proptest to verify:
//! 1. A valid range yields exactly `day_count()` days, ascending, one per calendar day
//! 2. Reversed ranges are always rejected
//! 3. Every day maps to a distinct, ISO-named workbook path

use chrono::{Days, NaiveDate};
use marketwatch_core::dates::{DateRange, RangeError};
use marketwatch_core::layout::workbook_path;
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Path;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~30 years.
    (0u64..11_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

proptest! {
    #[test]
    fn range_yields_one_day_per_calendar_day(start in arb_date(), span in 0u64..400) {
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let range = DateRange::new(start, end).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();

        prop_assert_eq!(days.len(), span as usize + 1);
        prop_assert_eq!(range.day_count(), days.len());
        prop_assert_eq!(days.first().copied(), Some(start));
        prop_assert_eq!(days.last().copied(), Some(end));
        for pair in days.windows(2) {
            prop_assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }
    }

    #[test]
    fn reversed_range_is_rejected(start in arb_date(), gap in 1u64..400) {
        let end = start.checked_add_days(Days::new(gap)).unwrap();
        let err = DateRange::new(end, start).unwrap_err();
        prop_assert_eq!(err, RangeError::StartAfterEnd { start: end, end: start });
    }

    #[test]
    fn string_parse_agrees_with_typed_range(start in arb_date(), span in 0u64..60) {
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let parsed = DateRange::parse(
            &start.format("%Y-%m-%d").to_string(),
            &end.format("%Y-%m-%d").to_string(),
        ).unwrap();
        prop_assert_eq!(parsed, DateRange::new(start, end).unwrap());
    }

    #[test]
    fn workbook_paths_are_distinct_and_iso_named(start in arb_date(), span in 0u64..120) {
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let range = DateRange::new(start, end).unwrap();
        let dir = Path::new("stage");

        let mut seen = HashSet::new();
        for day in range.days() {
            let path = workbook_path(dir, day);
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            prop_assert_eq!(&name, &format!("{}.xlsx", day.format("%Y-%m-%d")));
            prop_assert!(seen.insert(name));
        }
        prop_assert_eq!(seen.len(), range.day_count());
    }
}
