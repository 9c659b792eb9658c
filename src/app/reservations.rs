use crate::app::marketplace::Marketplace;
use crate::core::availability::{booked_days, has_conflict};
use crate::core::pricing::{quote, PriceQuote};
use crate::domain::model::{
    ListingId, Reservation, ReservationId, ReservationQuery, StayWindow, User,
};
use crate::domain::ports::MarketStore;
use crate::utils::error::{MarketError, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 建立訂房的輸入，`total_price` 是前端顯示的金額（可省略）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub listing_id: ListingId,
    pub window: StayWindow,
    pub total_price: Option<i64>,
}

/// 房源頁面顯示的報價，附上市集設定的幣別
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayQuote {
    pub listing_id: ListingId,
    pub window: StayWindow,
    #[serde(flatten)]
    pub price: PriceQuote,
    pub currency: String,
}

impl<S: MarketStore> Marketplace<S> {
    async fn booked_windows(&self, listing_id: ListingId) -> Result<Vec<StayWindow>> {
        let reservations = self
            .store
            .find_reservations(&ReservationQuery::for_listing(listing_id))
            .await?;
        Ok(reservations.iter().map(Reservation::window).collect())
    }

    pub async fn quote_stay(&self, listing_id: ListingId, window: StayWindow) -> Result<StayQuote> {
        let listing = self.get_listing(listing_id).await?;
        let price = quote(&window, listing.price)?;
        Ok(StayQuote {
            listing_id,
            window,
            price,
            currency: self.settings.currency.clone(),
        })
    }

    /// Prices the stay from the listing's nightly rate and books it if the
    /// dates are free. A client total that disagrees with the computed one
    /// is rejected so the caller can refresh its quote.
    pub async fn create_reservation(
        &self,
        actor: Option<&User>,
        draft: ReservationDraft,
    ) -> Result<Reservation> {
        let actor = self.require_actor(actor)?;
        draft.window.validate()?;
        let listing = self.get_listing(draft.listing_id).await?;

        let priced = quote(&draft.window, listing.price)?;
        if let Some(client_total) = draft.total_price {
            if client_total != priced.total_price {
                return Err(MarketError::validation(format!(
                    "totalPrice {} does not match {} for {} night(s)",
                    client_total, priced.total_price, priced.nights
                )));
            }
        }

        let existing = self.booked_windows(listing.id).await?;
        if has_conflict(&draft.window, &existing)? {
            return Err(MarketError::Unavailable {
                listing_id: listing.id.to_string(),
                window: draft.window.to_string(),
            });
        }

        let reservation = Reservation {
            id: Uuid::new_v4(),
            listing_id: listing.id,
            user_id: actor.id,
            start_date: draft.window.start,
            end_date: draft.window.end,
            total_price: priced.total_price,
            created_at: Utc::now(),
        };

        // 儲存層會在寫入鎖內再檢查一次重疊
        let reservation = self.store.insert_reservation(reservation).await?;
        tracing::info!(
            "User {} reserved {} for {} ({} nights, total {} {})",
            actor.id,
            listing.id,
            draft.window,
            priced.nights,
            priced.total_price,
            self.settings.currency
        );
        Ok(reservation)
    }

    pub async fn listing_reservations(&self, listing_id: ListingId) -> Result<Vec<Reservation>> {
        self.store
            .find_reservations(&ReservationQuery::for_listing(listing_id))
            .await
    }

    /// Reservations the actor made as a guest.
    pub async fn trips(&self, actor: Option<&User>) -> Result<Vec<Reservation>> {
        let actor = self.require_actor(actor)?;
        self.store
            .find_reservations(&ReservationQuery::for_guest(actor.id))
            .await
    }

    /// Reservations other guests made on the actor's listings.
    pub async fn reservations_on_my_properties(
        &self,
        actor: Option<&User>,
    ) -> Result<Vec<Reservation>> {
        let actor = self.require_actor(actor)?;
        self.store
            .find_reservations(&ReservationQuery::for_host(actor.id))
            .await
    }

    /// 旅客或房東可以取消；回傳刪除筆數
    pub async fn cancel_reservation(&self, actor: Option<&User>, id: ReservationId) -> Result<u64> {
        let actor = self.require_actor(actor)?;
        let deleted = self.store.delete_reservation(id, actor.id).await?;
        if deleted == 0 {
            tracing::warn!("User {} could not cancel reservation {}", actor.id, id);
        } else {
            tracing::info!("User {} cancelled reservation {}", actor.id, id);
        }
        Ok(deleted)
    }

    pub async fn disabled_dates(&self, listing_id: ListingId) -> Result<Vec<NaiveDate>> {
        let existing = self.booked_windows(listing_id).await?;
        Ok(booked_days(&existing)?)
    }
}
