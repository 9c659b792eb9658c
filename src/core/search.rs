use crate::core::availability::has_conflict;
use crate::domain::model::{Category, Listing, Reservation, StayWindow, UserId};
use crate::utils::error::{MarketError, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// 搜尋參數的原始輸入（例如 query string），尚未驗證
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub user_id: Option<String>,
    pub guest_count: Option<u32>,
    pub room_count: Option<u32>,
    pub bathroom_count: Option<u32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location_value: Option<String>,
    pub category: Option<String>,
}

/// Validated listing filter. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingCriteria {
    pub user_id: Option<UserId>,
    pub category: Option<Category>,
    pub min_guests: Option<u32>,
    pub min_rooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub location_value: Option<String>,
    pub window: Option<StayWindow>,
}

impl ListingCriteria {
    pub fn with_window(mut self, window: StayWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Attribute filters only; the date window is checked against reservations.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.user_id.map_or(true, |id| listing.user_id == id)
            && self.category.map_or(true, |c| listing.category == c)
            && self.min_guests.map_or(true, |n| listing.guest_count >= n)
            && self.min_rooms.map_or(true, |n| listing.room_count >= n)
            && self.min_bathrooms.map_or(true, |n| listing.bathroom_count >= n)
            && self
                .location_value
                .as_deref()
                .map_or(true, |loc| listing.location_value == loc)
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is used).
pub fn parse_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            MarketError::validation(format!("{} is not a valid date: {}", field_name, value))
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl TryFrom<SearchParams> for ListingCriteria {
    type Error = MarketError;

    fn try_from(params: SearchParams) -> Result<Self> {
        let user_id = non_empty(params.user_id)
            .map(|id| {
                Uuid::parse_str(&id).map_err(|_| {
                    MarketError::validation(format!("userId is not a valid id: {}", id))
                })
            })
            .transpose()?;

        let category = non_empty(params.category)
            .map(|c| c.parse::<Category>().map_err(MarketError::validation))
            .transpose()?;

        let window = match (non_empty(params.start_date), non_empty(params.end_date)) {
            (Some(start), Some(end)) => Some(StayWindow::new(
                parse_date("startDate", &start)?,
                parse_date("endDate", &end)?,
            )?),
            (None, None) => None,
            _ => {
                return Err(MarketError::validation(
                    "startDate and endDate must be given together",
                ))
            }
        };

        Ok(Self {
            user_id,
            category,
            min_guests: params.guest_count.filter(|n| *n > 0),
            min_rooms: params.room_count.filter(|n| *n > 0),
            min_bathrooms: params.bathroom_count.filter(|n| *n > 0),
            location_value: non_empty(params.location_value),
            window,
        })
    }
}

/// 依條件過濾房源，有日期區間時排除已被預訂的房源；結果依建立時間新到舊排序
pub fn filter_listings(
    listings: Vec<Listing>,
    reservations: &[Reservation],
    criteria: &ListingCriteria,
) -> Result<Vec<Listing>> {
    let mut booked: HashMap<_, Vec<StayWindow>> = HashMap::new();
    if criteria.window.is_some() {
        for reservation in reservations {
            booked
                .entry(reservation.listing_id)
                .or_default()
                .push(reservation.window());
        }
    }

    let mut results = Vec::with_capacity(listings.len());
    for listing in listings {
        if !criteria.matches(&listing) {
            continue;
        }
        if let Some(window) = &criteria.window {
            let existing = booked.get(&listing.id).map(Vec::as_slice).unwrap_or(&[]);
            if has_conflict(window, existing)? {
                tracing::debug!("Excluding listing {} booked during {}", listing.id, window);
                continue;
            }
        }
        results.push(listing);
    }

    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn listing(category: Category, guests: u32, age_days: i64) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            title: format!("{} house", category),
            description: "Nice".to_string(),
            image_src: "https://example.com/a.jpg".to_string(),
            category,
            room_count: 2,
            bathroom_count: 1,
            guest_count: guests,
            location_value: "PT".to_string(),
            user_id: Uuid::nil(),
            price: 100,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::days(age_days),
        }
    }

    fn reservation(listing_id: Uuid, start: NaiveDate, end: NaiveDate) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            listing_id,
            user_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            total_price: 100,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_params_require_both_dates() {
        let params = SearchParams {
            start_date: Some("2024-06-01".to_string()),
            ..SearchParams::default()
        };
        assert!(ListingCriteria::try_from(params).is_err());
    }

    #[test]
    fn test_params_reject_reversed_window() {
        let params = SearchParams {
            start_date: Some("2024-06-08".to_string()),
            end_date: Some("2024-06-01".to_string()),
            ..SearchParams::default()
        };
        let err = ListingCriteria::try_from(params).unwrap_err();
        assert!(matches!(err, MarketError::Stay(_)));
    }

    #[test]
    fn test_params_accept_iso_timestamps_and_labels() {
        let params = SearchParams {
            start_date: Some("2024-06-01T00:00:00.000Z".to_string()),
            end_date: Some("2024-06-03".to_string()),
            category: Some("beach".to_string()),
            guest_count: Some(0),
            ..SearchParams::default()
        };
        let criteria = ListingCriteria::try_from(params).unwrap();
        assert_eq!(criteria.category, Some(Category::Beach));
        assert_eq!(criteria.min_guests, None);
        assert_eq!(criteria.window.unwrap().start, date(6, 1));
    }

    #[test]
    fn test_open_search_skips_date_filter() {
        let a = listing(Category::Beach, 4, 0);
        let b = listing(Category::Cave, 2, 1);
        let reservations = vec![reservation(a.id, date(6, 1), date(6, 5))];

        let results =
            filter_listings(vec![a, b], &reservations, &ListingCriteria::default()).unwrap();
        assert_eq!(results.len(), 2);
        // newest first
        assert_eq!(results[0].category, Category::Cave);
    }

    #[test]
    fn test_window_excludes_booked_listings() {
        let a = listing(Category::Beach, 4, 0);
        let b = listing(Category::Beach, 4, 1);
        let reservations = vec![reservation(a.id, date(6, 1), date(6, 5))];

        let criteria = ListingCriteria::default()
            .with_window(StayWindow::new(date(6, 5), date(6, 8)).unwrap());
        let results = filter_listings(vec![a, b.clone()], &reservations, &criteria).unwrap();
        assert_eq!(results, vec![b]);
    }

    #[test]
    fn test_attribute_filters_use_minimums() {
        let small = listing(Category::Lake, 2, 0);
        let large = listing(Category::Lake, 6, 1);
        let criteria = ListingCriteria {
            min_guests: Some(3),
            category: Some(Category::Lake),
            ..ListingCriteria::default()
        };
        let results = filter_listings(vec![small, large.clone()], &[], &criteria).unwrap();
        assert_eq!(results, vec![large]);
    }
}
