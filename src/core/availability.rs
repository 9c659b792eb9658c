//! Date-overlap checks between a candidate stay and existing reservations.
//!
//! Boundaries are inclusive on both ends: a check-out day is still occupied,
//! so a stay starting on another stay's check-out day conflicts with it.

use crate::domain::error::StayError;
use crate::domain::model::StayWindow;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// 兩個區間是否共用至少一個日曆日
pub fn windows_overlap(a: &StayWindow, b: &StayWindow) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// Returns true when `candidate` overlaps any window in `existing`.
pub fn has_conflict(candidate: &StayWindow, existing: &[StayWindow]) -> Result<bool, StayError> {
    candidate.validate()?;
    for booked in existing {
        booked.validate()?;
    }

    Ok(existing
        .iter()
        .any(|booked| windows_overlap(candidate, booked)))
}

pub fn is_available(candidate: &StayWindow, existing: &[StayWindow]) -> Result<bool, StayError> {
    has_conflict(candidate, existing).map(|conflict| !conflict)
}

/// 所有已被預訂的日期（排序、去重），用於日曆上停用日期
pub fn booked_days(existing: &[StayWindow]) -> Result<Vec<NaiveDate>, StayError> {
    let mut days = BTreeSet::new();
    for booked in existing {
        booked.validate()?;
        days.extend(booked.days());
    }
    Ok(days.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn window(start: (u32, u32), end: (u32, u32)) -> StayWindow {
        StayWindow {
            start: date(start.0, start.1),
            end: date(end.0, end.1),
        }
    }

    #[test]
    fn test_shared_checkout_day_conflicts() {
        let existing = [window((6, 1), (6, 5))];
        let candidate = window((6, 5), (6, 8));

        assert!(has_conflict(&candidate, &existing).unwrap());
        assert!(!is_available(&candidate, &existing).unwrap());
    }

    #[test]
    fn test_day_after_checkout_is_free() {
        let existing = [window((6, 1), (6, 5))];
        let candidate = window((6, 6), (6, 8));

        assert!(!has_conflict(&candidate, &existing).unwrap());
        assert!(is_available(&candidate, &existing).unwrap());
    }

    #[test]
    fn test_no_reservations_is_always_available() {
        let candidate = window((1, 1), (12, 31));
        assert!(is_available(&candidate, &[]).unwrap());
    }

    #[test]
    fn test_enclosing_and_enclosed_windows_conflict() {
        let existing = [window((6, 10), (6, 12))];
        assert!(has_conflict(&window((6, 1), (6, 30)), &existing).unwrap());
        assert!(has_conflict(&window((6, 11), (6, 11)), &existing).unwrap());
    }

    #[test]
    fn test_any_conflicting_reservation_blocks() {
        let existing = [
            window((5, 1), (5, 3)),
            window((7, 1), (7, 3)),
            window((6, 20), (6, 22)),
        ];
        assert!(has_conflict(&window((6, 18), (6, 20)), &existing).unwrap());
        assert!(!has_conflict(&window((6, 1), (6, 19)), &existing).unwrap());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let windows = [
            window((6, 1), (6, 5)),
            window((6, 5), (6, 8)),
            window((6, 6), (6, 8)),
            window((5, 30), (6, 2)),
            window((6, 9), (6, 9)),
        ];
        for a in &windows {
            for b in &windows {
                assert_eq!(windows_overlap(a, b), windows_overlap(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_reversed_candidate_is_rejected() {
        let reversed = StayWindow {
            start: date(6, 8),
            end: date(6, 1),
        };
        let err = is_available(&reversed, &[]).unwrap_err();
        assert!(matches!(err, StayError::InvalidRange { .. }));
    }

    #[test]
    fn test_reversed_existing_window_is_rejected() {
        let reversed = StayWindow {
            start: date(6, 8),
            end: date(6, 1),
        };
        let err = has_conflict(&window((7, 1), (7, 2)), &[reversed]).unwrap_err();
        assert!(matches!(err, StayError::InvalidRange { .. }));
    }

    #[test]
    fn test_booked_days_merges_overlapping_reservations() {
        let days = booked_days(&[window((6, 1), (6, 3)), window((6, 3), (6, 4))]).unwrap();
        assert_eq!(days, vec![date(6, 1), date(6, 2), date(6, 3), date(6, 4)]);
    }
}
