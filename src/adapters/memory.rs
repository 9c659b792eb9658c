use crate::core::availability::has_conflict;
use crate::domain::model::{
    LinkedAccount, Listing, ListingId, Reservation, ReservationId, ReservationQuery, User, UserId,
};
use crate::domain::ports::{ListingRepository, ReservationRepository, UserRepository};
use crate::utils::error::{MarketError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// 完整資料快照，可序列化成 JSON 檔
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn insert_listing(&self, listing: Listing) -> Result<Listing> {
        let mut state = self.state.write().await;
        if state.listings.iter().any(|l| l.id == listing.id) {
            return Err(MarketError::AlreadyExists {
                entity: "Listing",
                key: listing.id.to_string(),
            });
        }
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, id: ListingId) -> Result<Option<Listing>> {
        let state = self.state.read().await;
        Ok(state.listings.iter().find(|l| l.id == id).cloned())
    }

    async fn all_listings(&self) -> Result<Vec<Listing>> {
        Ok(self.state.read().await.listings.clone())
    }

    async fn listings_by_ids(&self, ids: &[ListingId]) -> Result<Vec<Listing>> {
        let state = self.state.read().await;
        Ok(state
            .listings
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }

    async fn delete_listing(&self, id: ListingId, owner_id: UserId) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.listings.len();
        state
            .listings
            .retain(|l| !(l.id == id && l.user_id == owner_id));
        let deleted = (before - state.listings.len()) as u64;

        if deleted > 0 {
            state.reservations.retain(|r| r.listing_id != id);
            for user in state.users.iter_mut() {
                user.favorite_ids.retain(|fav| *fav != id);
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation> {
        let mut state = self.state.write().await;
        if !state.listings.iter().any(|l| l.id == reservation.listing_id) {
            return Err(MarketError::not_found("Listing", reservation.listing_id));
        }

        let existing: Vec<_> = state
            .reservations
            .iter()
            .filter(|r| r.listing_id == reservation.listing_id)
            .map(Reservation::window)
            .collect();
        let window = reservation.window();
        if has_conflict(&window, &existing)? {
            return Err(MarketError::Unavailable {
                listing_id: reservation.listing_id.to_string(),
                window: window.to_string(),
            });
        }

        state.reservations.push(reservation.clone());
        Ok(reservation)
    }

    async fn find_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>> {
        let state = self.state.read().await;
        let mut found: Vec<Reservation> = state
            .reservations
            .iter()
            .filter(|r| query.listing_id.map_or(true, |id| r.listing_id == id))
            .filter(|r| query.user_id.map_or(true, |id| r.user_id == id))
            .filter(|r| {
                query.author_id.map_or(true, |author| {
                    state
                        .listings
                        .iter()
                        .any(|l| l.id == r.listing_id && l.user_id == author)
                })
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete_reservation(&self, id: ReservationId, actor_id: UserId) -> Result<u64> {
        let mut state = self.state.write().await;
        let owners: Vec<(ListingId, UserId)> =
            state.listings.iter().map(|l| (l.id, l.user_id)).collect();

        let before = state.reservations.len();
        state.reservations.retain(|r| {
            let is_guest = r.user_id == actor_id;
            let is_host = owners
                .iter()
                .any(|(listing_id, owner)| *listing_id == r.listing_id && *owner == actor_id);
            !(r.id == id && (is_guest || is_host))
        });
        Ok((before - state.reservations.len()) as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(MarketError::AlreadyExists {
                entity: "User",
                key: user.email,
            });
        }
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn find_user_by_account(&self, account: &LinkedAccount) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .find(|u| u.accounts.contains(account))
            .cloned())
    }

    async fn link_account(&self, user_id: UserId, account: LinkedAccount) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| MarketError::not_found("User", user_id))?;
        if !user.accounts.contains(&account) {
            user.accounts.push(account);
            user.updated_at = Utc::now();
        }
        Ok(user.clone())
    }

    async fn add_favorite_listing(&self, user_id: UserId, listing_id: ListingId) -> Result<User> {
        let mut state = self.state.write().await;
        if !state.listings.iter().any(|l| l.id == listing_id) {
            return Err(MarketError::not_found("Listing", listing_id));
        }
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| MarketError::not_found("User", user_id))?;
        if !user.favorite_ids.contains(&listing_id) {
            user.favorite_ids.push(listing_id);
            user.updated_at = Utc::now();
        }
        Ok(user.clone())
    }

    async fn remove_favorite_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| MarketError::not_found("User", user_id))?;
        let before = user.favorite_ids.len();
        user.favorite_ids.retain(|id| *id != listing_id);
        if user.favorite_ids.len() != before {
            user.updated_at = Utc::now();
        }
        Ok(user.clone())
    }
}
