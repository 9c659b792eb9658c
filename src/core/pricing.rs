use crate::domain::error::StayError;
use crate::domain::model::StayWindow;
use serde::{Deserialize, Serialize};

/// 日期區間改變時重新計算的報價
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub nights: i64,
    pub nightly_rate: i64,
    pub total_price: i64,
}

/// Nights between check-in and check-out, not counting the check-out day.
/// A same-day window counts as one night.
pub fn night_count(window: &StayWindow) -> Result<i64, StayError> {
    window.validate()?;
    let nights = (window.end - window.start).num_days();
    Ok(nights.max(1))
}

pub fn calculate_total_price(window: &StayWindow, nightly_rate: i64) -> Result<i64, StayError> {
    quote(window, nightly_rate).map(|quote| quote.total_price)
}

pub fn quote(window: &StayWindow, nightly_rate: i64) -> Result<PriceQuote, StayError> {
    if nightly_rate <= 0 {
        return Err(StayError::pricing(format!(
            "nightly rate must be positive, got {}",
            nightly_rate
        )));
    }

    let nights = night_count(window)?;
    let total_price = nights
        .checked_mul(nightly_rate)
        .ok_or_else(|| StayError::pricing("total price overflows"))?;

    Ok(PriceQuote {
        nights,
        nightly_rate,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(start: u32, end: u32) -> StayWindow {
        StayWindow {
            start: NaiveDate::from_ymd_opt(2024, 6, start).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, end).unwrap(),
        }
    }

    #[test]
    fn test_three_night_stay() {
        assert_eq!(night_count(&window(1, 4)).unwrap(), 3);
        assert_eq!(calculate_total_price(&window(1, 4), 100).unwrap(), 300);
    }

    #[test]
    fn test_one_night_stay() {
        assert_eq!(calculate_total_price(&window(1, 2), 100).unwrap(), 100);
    }

    #[test]
    fn test_same_day_counts_as_one_night() {
        assert_eq!(night_count(&window(1, 1)).unwrap(), 1);
        assert_eq!(calculate_total_price(&window(1, 1), 100).unwrap(), 100);
    }

    #[test]
    fn test_non_positive_rate_is_rejected() {
        for rate in [0, -50] {
            let err = calculate_total_price(&window(1, 4), rate).unwrap_err();
            assert!(matches!(err, StayError::InvalidPricingInput { .. }));
        }
    }

    #[test]
    fn test_reversed_window_is_rejected() {
        let err = calculate_total_price(&window(4, 1), 100).unwrap_err();
        assert!(matches!(err, StayError::InvalidRange { .. }));
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = calculate_total_price(&window(1, 3), i64::MAX).unwrap_err();
        assert!(matches!(err, StayError::InvalidPricingInput { .. }));
    }

    #[test]
    fn test_total_grows_with_nights() {
        let mut previous = 0;
        for end in 1..=30 {
            let total = calculate_total_price(&window(1, end), 85).unwrap();
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn test_repeated_calls_agree() {
        let first = quote(&window(3, 9), 120).unwrap();
        let second = quote(&window(3, 9), 120).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.nights, 6);
        assert_eq!(first.total_price, 720);
    }
}
