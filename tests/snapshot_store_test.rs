use anyhow::Result;
use chrono::NaiveDate;
use stay_market::app::api::{self, CreateReservationRequest};
use stay_market::app::{MarketSettings, Marketplace, RegisterRequest, ReservationDraft};
use stay_market::domain::model::{Category, ListingDraft};
use stay_market::{MemoryStore, SnapshotFile};
use tempfile::TempDir;

fn test_settings() -> MarketSettings {
    // bcrypt 最低成本，讓測試跑得快
    MarketSettings {
        bcrypt_cost: 4,
        ..MarketSettings::default()
    }
}

#[tokio::test]
async fn test_missing_file_loads_empty_snapshot() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = SnapshotFile::new(temp_dir.path().join("absent.json"));

    let snapshot = file.load().await?;
    assert!(snapshot.users.is_empty());
    assert!(snapshot.listings.is_empty());
    assert!(snapshot.reservations.is_empty());
    Ok(())
}

/// 存檔後重新載入，訂房與重疊檢查仍然有效
#[tokio::test]
async fn test_marketplace_survives_save_and_reload() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = SnapshotFile::new(temp_dir.path().join("nested/dir/market.json"));

    let market = Marketplace::with_settings(MemoryStore::new(), test_settings());
    let host = market
        .register(RegisterRequest {
            email: "host@example.com".to_string(),
            name: "Host".to_string(),
            password: "long-enough".to_string(),
        })
        .await?;
    let listing = market
        .create_listing(
            Some(&host),
            ListingDraft {
                title: "Windmill".to_string(),
                description: "Dutch classic".to_string(),
                image_src: "https://example.com/mill.jpg".to_string(),
                category: Category::Windmills,
                room_count: 1,
                bathroom_count: 1,
                guest_count: 2,
                location_value: "NL".to_string(),
                price: 90,
            },
        )
        .await?;
    let draft = ReservationDraft::try_from(CreateReservationRequest {
        listing_id: listing.id.to_string(),
        start_date: "2024-06-01".to_string(),
        end_date: "2024-06-05".to_string(),
        total_price: Some(360),
    })?;
    market.create_reservation(Some(&host), draft).await?;

    file.save(&market.store().snapshot().await).await?;
    assert!(file.path().exists());

    let store = MemoryStore::from_snapshot(file.load().await?);
    let reloaded = Marketplace::with_settings(store, test_settings());
    let user = reloaded.authenticate("host@example.com", "long-enough").await?;
    assert_eq!(user.id, host.id);

    let days = reloaded.disabled_dates(listing.id).await?;
    assert_eq!(days.len(), 5);
    assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());

    let conflict = ReservationDraft::try_from(CreateReservationRequest {
        listing_id: listing.id.to_string(),
        start_date: "2024-06-05".to_string(),
        end_date: "2024-06-06".to_string(),
        total_price: None,
    })?;
    let response = api::respond(reloaded.create_reservation(Some(&user), conflict).await);
    assert_eq!(response.status, 409);
    Ok(())
}

/// 覆寫時先寫暫存檔再改名，目錄裡只留下目標檔
#[tokio::test]
async fn test_save_replaces_file_without_leftovers() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("market.json");
    tokio::fs::write(&path, b"{ \"users\": [] }").await?;
    let file = SnapshotFile::new(&path);

    let market = Marketplace::with_settings(MemoryStore::new(), test_settings());
    market
        .register(RegisterRequest {
            email: "first@example.com".to_string(),
            name: "First".to_string(),
            password: "long-enough".to_string(),
        })
        .await?;
    file.save(&market.store().snapshot().await).await?;
    market
        .register(RegisterRequest {
            email: "second@example.com".to_string(),
            name: "Second".to_string(),
            password: "long-enough".to_string(),
        })
        .await?;
    file.save(&market.store().snapshot().await).await?;

    assert_eq!(file.load().await?.users.len(), 2);

    let mut entries = tokio::fs::read_dir(temp_dir.path()).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["market.json".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_is_a_serialization_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("market.json");
    tokio::fs::write(&path, b"{ not json").await?;

    let err = SnapshotFile::new(&path).load().await.unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().starts_with("Serialization error"));
    Ok(())
}

#[test]
fn test_snapshot_file_path_is_kept() {
    let file = SnapshotFile::new("data/market.json");
    assert_eq!(file.path(), std::path::Path::new("data/market.json"));
    tokio_test::block_on(async {
        // 相對路徑且檔案不存在時視為空資料
        let temp_dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(temp_dir.path().join("market.json"));
        assert!(file.load().await.unwrap().users.is_empty());
    });
}
