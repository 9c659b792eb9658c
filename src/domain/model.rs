use crate::domain::error::StayError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type UserId = Uuid;
pub type ListingId = Uuid;
pub type ReservationId = Uuid;

/// 住宿區間，以日曆日為單位，`start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayWindow {
    /// 建立區間；`start > end` 時回傳 `InvalidRange`，不會自動對調
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StayError> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), StayError> {
        if self.start > self.end {
            return Err(StayError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Every calendar day from `start` through `end`, both included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

impl fmt::Display for StayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Beach,
    Windmills,
    Modern,
    Countryside,
    Pools,
    Island,
    Lake,
    #[serde(alias = "Sking")]
    Skiing,
    Castle,
    Camping,
    Arctic,
    Cave,
    Desert,
    Barns,
    Lux,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::Beach,
        Category::Windmills,
        Category::Modern,
        Category::Countryside,
        Category::Pools,
        Category::Island,
        Category::Lake,
        Category::Skiing,
        Category::Castle,
        Category::Camping,
        Category::Arctic,
        Category::Cave,
        Category::Desert,
        Category::Barns,
        Category::Lux,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Beach => "Beach",
            Category::Windmills => "Windmills",
            Category::Modern => "Modern",
            Category::Countryside => "Countryside",
            Category::Pools => "Pools",
            Category::Island => "Island",
            Category::Lake => "Lake",
            Category::Skiing => "Skiing",
            Category::Castle => "Castle",
            Category::Camping => "Camping",
            Category::Arctic => "Arctic",
            Category::Cave => "Cave",
            Category::Desert => "Desert",
            Category::Barns => "Barns",
            Category::Lux => "Lux",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Beach => "This property is close to the beach!",
            Category::Windmills => "This property has windmills",
            Category::Modern => "This property is modern",
            Category::Countryside => "This property is in the countryside",
            Category::Pools => "This property has a pool",
            Category::Island => "This property is on an island",
            Category::Lake => "This property is close to a lake",
            Category::Skiing => "This property has skiing activities",
            Category::Castle => "This property is in a castle",
            Category::Camping => "This property has camping activities",
            Category::Arctic => "This property is in the arctic",
            Category::Cave => "This property is in a cave",
            Category::Desert => "This property is in the desert",
            Category::Barns => "This property is in a barn",
            Category::Lux => "This property is luxurious",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("sking") {
            return Ok(Category::Skiing);
        }
        Category::ALL
            .iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: Category,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub guest_count: u32,
    pub location_value: String,
    pub user_id: UserId,
    /// 每晚價格
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

/// 新增房源時由房東填寫的內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub category: Category,
    pub room_count: u32,
    pub bathroom_count: u32,
    pub guest_count: u32,
    pub location_value: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub listing_id: ListingId,
    pub user_id: UserId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn window(&self) -> StayWindow {
        StayWindow {
            start: self.start_date,
            end: self.end_date,
        }
    }
}

/// 外部 OAuth 帳號連結 (provider + provider 端帳號 ID)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub provider: String,
    pub provider_account_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    /// OAuth-only users have no password.
    pub hashed_password: Option<String>,
    #[serde(default)]
    pub favorite_ids: Vec<ListingId>,
    #[serde(default)]
    pub accounts: Vec<LinkedAccount>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 對外輸出的使用者資料，不含密碼雜湊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub favorite_ids: Vec<ListingId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            favorite_ids: user.favorite_ids.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 登入後發出的 session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Typed reservation lookup. Every populated field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationQuery {
    pub listing_id: Option<ListingId>,
    /// 訂房的旅客
    pub user_id: Option<UserId>,
    /// 房源的房東
    pub author_id: Option<UserId>,
}

impl ReservationQuery {
    pub fn for_listing(listing_id: ListingId) -> Self {
        Self {
            listing_id: Some(listing_id),
            ..Self::default()
        }
    }

    pub fn for_guest(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn for_host(author_id: UserId) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stay_window_rejects_reversed_range() {
        let err = StayWindow::new(date(2024, 6, 5), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, StayError::InvalidRange { .. }));
    }

    #[test]
    fn test_stay_window_days_are_inclusive() {
        let window = StayWindow::new(date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        let days: Vec<_> = window.days().collect();
        assert_eq!(days, vec![date(2024, 6, 1), date(2024, 6, 2), date(2024, 6, 3)]);
    }

    #[test]
    fn test_category_parses_label_case_insensitively() {
        assert_eq!("beach".parse::<Category>().unwrap(), Category::Beach);
        assert_eq!(" Lux ".parse::<Category>().unwrap(), Category::Lux);
        assert!("Volcano".parse::<Category>().is_err());
    }

    #[test]
    fn test_legacy_sking_label_reads_as_skiing() {
        assert_eq!("Sking".parse::<Category>().unwrap(), Category::Skiing);
        let parsed: Category = serde_json::from_str("\"Sking\"").unwrap();
        assert_eq!(parsed, Category::Skiing);
        assert_eq!(serde_json::to_string(&Category::Skiing).unwrap(), "\"Skiing\"");
        assert_eq!(Category::Castle.label(), "Castle");
    }

    #[test]
    fn test_user_profile_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: Some("Guest".to_string()),
            email: "guest@example.com".to_string(),
            image: None,
            hashed_password: Some("salt$digest".to_string()),
            favorite_ids: vec![],
            accounts: vec![],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(json.get("hashedPassword").is_none());
        assert_eq!(json["email"], "guest@example.com");
    }
}
