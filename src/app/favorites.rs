use crate::app::marketplace::Marketplace;
use crate::domain::model::{Listing, ListingId, User};
use crate::domain::ports::MarketStore;
use crate::utils::error::{MarketError, Result};

impl<S: MarketStore> Marketplace<S> {
    pub async fn add_favorite(&self, actor: Option<&User>, listing_id: ListingId) -> Result<User> {
        let actor = self.require_actor(actor)?;
        self.store
            .add_favorite_listing(actor.id, listing_id)
            .await
            .map_err(signed_out_if_user_missing)
    }

    pub async fn remove_favorite(
        &self,
        actor: Option<&User>,
        listing_id: ListingId,
    ) -> Result<User> {
        let actor = self.require_actor(actor)?;
        self.store
            .remove_favorite_listing(actor.id, listing_id)
            .await
            .map_err(signed_out_if_user_missing)
    }

    /// 未登入時回傳空清單
    pub async fn favorite_listings(&self, actor: Option<&User>) -> Result<Vec<Listing>> {
        let Some(actor) = actor else {
            return Ok(Vec::new());
        };
        let Some(user) = self.store.find_user(actor.id).await? else {
            return Ok(Vec::new());
        };
        self.store.listings_by_ids(&user.favorite_ids).await
    }
}

// 使用者已被刪除時視同未登入
fn signed_out_if_user_missing(error: MarketError) -> MarketError {
    match error {
        MarketError::NotFound { entity: "User", .. } => MarketError::Unauthorized,
        other => other,
    }
}
