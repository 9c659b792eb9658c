pub mod availability;
pub mod pricing;
pub mod search;

pub use crate::domain::error::StayError;
pub use crate::domain::model::StayWindow;
pub use availability::{booked_days, has_conflict, is_available, windows_overlap};
pub use pricing::{calculate_total_price, night_count, quote, PriceQuote};
pub use search::{filter_listings, ListingCriteria, SearchParams};
