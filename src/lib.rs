pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{MemoryStore, Snapshot, SnapshotFile};
pub use app::{Marketplace, MarketSettings};
pub use config::AppConfig;
pub use core::{calculate_total_price, is_available, ListingCriteria, StayWindow};
pub use utils::error::{MarketError, Result};
