use crate::domain::model::{
    LinkedAccount, Listing, ListingId, Reservation, ReservationId, ReservationQuery, User, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert_listing(&self, listing: Listing) -> Result<Listing>;
    async fn find_listing(&self, id: ListingId) -> Result<Option<Listing>>;
    async fn all_listings(&self) -> Result<Vec<Listing>>;
    async fn listings_by_ids(&self, ids: &[ListingId]) -> Result<Vec<Listing>>;
    /// 只刪除 `owner_id` 擁有的房源，並一併刪除其訂房；回傳刪除筆數
    async fn delete_listing(&self, id: ListingId, owner_id: UserId) -> Result<u64>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Must reject a reservation whose window overlaps an existing reservation
    /// on the same listing, atomically with the insert.
    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation>;
    async fn find_reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>>;
    /// 只有旅客本人或房東可以刪除；回傳刪除筆數
    async fn delete_reservation(&self, id: ReservationId, actor_id: UserId) -> Result<u64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<User>;
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_account(&self, account: &LinkedAccount) -> Result<Option<User>>;
    async fn link_account(&self, user_id: UserId, account: LinkedAccount) -> Result<User>;
    /// Adds `listing_id` to the user's favorites in one step. Fails with
    /// `NotFound` when the listing does not exist; adding twice is a no-op.
    async fn add_favorite_listing(&self, user_id: UserId, listing_id: ListingId) -> Result<User>;
    async fn remove_favorite_listing(
        &self,
        user_id: UserId,
        listing_id: ListingId,
    ) -> Result<User>;
}

/// 一個實作就能提供全部持久化功能的儲存層
pub trait MarketStore: ListingRepository + ReservationRepository + UserRepository {}

impl<T> MarketStore for T where T: ListingRepository + ReservationRepository + UserRepository {}
