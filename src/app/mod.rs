// Application layer: marketplace request handlers and their JSON mapping.

pub mod accounts;
pub mod api;
pub mod credentials;
pub mod favorites;
pub mod listings;
pub mod marketplace;
pub mod reservations;

pub use accounts::{OAuthProfile, RegisterRequest};
pub use listings::ListingDetails;
pub use marketplace::{MarketSettings, Marketplace};
pub use reservations::{ReservationDraft, StayQuote};
