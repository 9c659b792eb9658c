use crate::app::marketplace::Marketplace;
use crate::core::availability::booked_days;
use crate::core::search::{filter_listings, ListingCriteria};
use crate::domain::model::{
    Listing, ListingDraft, ListingId, Reservation, ReservationQuery, User, UserProfile,
};
use crate::domain::ports::MarketStore;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{
    as_input_error, validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

impl Validate for ListingDraft {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("title", &self.title).map_err(as_input_error)?;
        validate_non_empty_string("description", &self.description).map_err(as_input_error)?;
        validate_url("imageSrc", &self.image_src).map_err(as_input_error)?;
        validate_non_empty_string("locationValue", &self.location_value)
            .map_err(as_input_error)?;
        validate_positive_number("roomCount", i64::from(self.room_count), 1)
            .map_err(as_input_error)?;
        validate_positive_number("bathroomCount", i64::from(self.bathroom_count), 1)
            .map_err(as_input_error)?;
        validate_positive_number("guestCount", i64::from(self.guest_count), 1)
            .map_err(as_input_error)?;
        validate_positive_number("price", self.price, 1).map_err(as_input_error)?;
        Ok(())
    }
}

/// 房源頁面所需資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDetails {
    pub listing: Listing,
    pub host: Option<UserProfile>,
    pub reservations: Vec<Reservation>,
    pub disabled_dates: Vec<NaiveDate>,
}

impl<S: MarketStore> Marketplace<S> {
    pub async fn create_listing(
        &self,
        actor: Option<&User>,
        draft: ListingDraft,
    ) -> Result<Listing> {
        let actor = self.require_actor(actor)?;
        draft.validate()?;

        let listing = Listing {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            image_src: draft.image_src,
            category: draft.category,
            room_count: draft.room_count,
            bathroom_count: draft.bathroom_count,
            guest_count: draft.guest_count,
            location_value: draft.location_value.trim().to_string(),
            user_id: actor.id,
            price: draft.price,
            created_at: Utc::now(),
        };

        let listing = self.store.insert_listing(listing).await?;
        tracing::info!("User {} listed {} ({})", actor.id, listing.id, listing.category);
        Ok(listing)
    }

    pub async fn get_listing(&self, id: ListingId) -> Result<Listing> {
        self.store
            .find_listing(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Listing", id))
    }

    pub async fn listing_details(&self, id: ListingId) -> Result<ListingDetails> {
        let listing = self.get_listing(id).await?;
        let host = self
            .store
            .find_user(listing.user_id)
            .await?
            .as_ref()
            .map(UserProfile::from);
        let reservations = self
            .store
            .find_reservations(&ReservationQuery::for_listing(id))
            .await?;
        let windows: Vec<_> = reservations.iter().map(Reservation::window).collect();
        let disabled_dates = booked_days(&windows)?;

        Ok(ListingDetails {
            listing,
            host,
            reservations,
            disabled_dates,
        })
    }

    pub async fn search_listings(&self, criteria: &ListingCriteria) -> Result<Vec<Listing>> {
        let listings = self.store.all_listings().await?;
        let reservations = match criteria.window {
            Some(_) => {
                self.store
                    .find_reservations(&ReservationQuery::default())
                    .await?
            }
            None => Vec::new(),
        };

        let results = filter_listings(listings, &reservations, criteria)?;
        tracing::debug!("Search matched {} listings", results.len());
        Ok(results)
    }

    /// 目前使用者自己刊登的房源
    pub async fn my_properties(&self, actor: Option<&User>) -> Result<Vec<Listing>> {
        let actor = self.require_actor(actor)?;
        let criteria = ListingCriteria {
            user_id: Some(actor.id),
            ..ListingCriteria::default()
        };
        self.search_listings(&criteria).await
    }

    /// Deletes the listing only when `actor` owns it. Returns how many were deleted.
    pub async fn delete_listing(&self, actor: Option<&User>, id: ListingId) -> Result<u64> {
        let actor = self.require_actor(actor)?;
        let deleted = self.store.delete_listing(id, actor.id).await?;
        if deleted == 0 {
            tracing::warn!("User {} could not delete listing {}", actor.id, id);
        } else {
            tracing::info!("User {} deleted listing {}", actor.id, id);
        }
        Ok(deleted)
    }
}
