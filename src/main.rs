use clap::Parser;
use stay_market::app::api::{self, ApiResponse, CreateReservationRequest};
use stay_market::app::{Marketplace, MarketSettings, RegisterRequest, ReservationDraft};
use stay_market::config::cli::{Command, Credentials};
use stay_market::core::search::SearchParams;
use stay_market::domain::model::{Category, ListingDraft, StayWindow, User};
use stay_market::utils::error::{ErrorSeverity, MarketError};
use stay_market::utils::{logger, validation::Validate};
use stay_market::{AppConfig, CliConfig, ListingCriteria, MemoryStore, SnapshotFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };
    if let Some(data_path) = &cli.data_path {
        config.storage.data_path = data_path.clone();
    }

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level(), cli.verbose);
    } else {
        logger::init_cli_logger(config.log_level(), cli.verbose);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::debug!("Config: {:?}", config);

    let snapshot_file = SnapshotFile::new(config.data_path());
    let snapshot = snapshot_file.load().await?;
    let market = Marketplace::with_settings(
        MemoryStore::from_snapshot(snapshot),
        MarketSettings::from(&config),
    );

    let response = match run(&market, cli.command.clone()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };

    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if !response.is_success() {
        std::process::exit(2);
    }

    if cli.command.mutates() {
        snapshot_file.save(&market.store().snapshot().await).await?;
        tracing::info!("📁 Data saved to: {}", snapshot_file.path().display());
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn sign_in(
    market: &Marketplace<MemoryStore>,
    auth: &Credentials,
) -> Result<User, MarketError> {
    market.authenticate(&auth.email, &auth.password).await
}

/// Sign-in failures abort the command; handler failures become error responses.
async fn run(
    market: &Marketplace<MemoryStore>,
    command: Command,
) -> Result<ApiResponse, MarketError> {
    let response = match command {
        Command::Register {
            email,
            name,
            password,
        } => api::respond_user(
            market
                .register(RegisterRequest {
                    email,
                    name,
                    password,
                })
                .await,
        ),

        Command::List {
            auth,
            title,
            description,
            image_src,
            category,
            rooms,
            bathrooms,
            guests,
            location,
            price,
        } => {
            let user = sign_in(market, &auth).await?;
            let category = category
                .parse::<Category>()
                .map_err(MarketError::validation)?;
            let draft = ListingDraft {
                title,
                description,
                image_src,
                category,
                room_count: rooms,
                bathroom_count: bathrooms,
                guest_count: guests,
                location_value: location,
                price,
            };
            api::respond(market.create_listing(Some(&user), draft).await)
        }

        Command::Search {
            guests,
            rooms,
            bathrooms,
            location,
            category,
            start,
            end,
        } => {
            let criteria = ListingCriteria::try_from(SearchParams {
                user_id: None,
                guest_count: guests,
                room_count: rooms,
                bathroom_count: bathrooms,
                start_date: start,
                end_date: end,
                location_value: location,
                category,
            })?;
            api::respond(market.search_listings(&criteria).await)
        }

        Command::Show { listing } => {
            let id = api::parse_id("listing", &listing)?;
            api::respond(market.listing_details(id).await)
        }

        Command::Quote {
            listing,
            start,
            end,
        } => {
            let id = api::parse_id("listing", &listing)?;
            let window = StayWindow::new(
                stay_market::core::search::parse_date("start", &start)?,
                stay_market::core::search::parse_date("end", &end)?,
            )?;
            api::respond(market.quote_stay(id, window).await)
        }

        Command::Reserve {
            auth,
            listing,
            start,
            end,
            total_price,
        } => {
            let user = sign_in(market, &auth).await?;
            let draft = ReservationDraft::try_from(CreateReservationRequest {
                listing_id: listing,
                start_date: start,
                end_date: end,
                total_price,
            })?;
            api::respond(market.create_reservation(Some(&user), draft).await)
        }

        Command::Cancel { auth, reservation } => {
            let user = sign_in(market, &auth).await?;
            let id = api::parse_id("reservation", &reservation)?;
            api::respond_deleted(market.cancel_reservation(Some(&user), id).await)
        }

        Command::Trips { auth } => {
            let user = sign_in(market, &auth).await?;
            api::respond(market.trips(Some(&user)).await)
        }

        Command::Reservations { auth } => {
            let user = sign_in(market, &auth).await?;
            api::respond(market.reservations_on_my_properties(Some(&user)).await)
        }

        Command::Properties { auth } => {
            let user = sign_in(market, &auth).await?;
            api::respond(market.my_properties(Some(&user)).await)
        }

        Command::Unlist { auth, listing } => {
            let user = sign_in(market, &auth).await?;
            let id = api::parse_id("listing", &listing)?;
            api::respond_deleted(market.delete_listing(Some(&user), id).await)
        }

        Command::Favorite { auth, listing } => {
            let user = sign_in(market, &auth).await?;
            let id = api::parse_id("listing", &listing)?;
            api::respond_user(market.add_favorite(Some(&user), id).await)
        }

        Command::Unfavorite { auth, listing } => {
            let user = sign_in(market, &auth).await?;
            let id = api::parse_id("listing", &listing)?;
            api::respond_user(market.remove_favorite(Some(&user), id).await)
        }

        Command::Favorites { auth } => {
            let user = sign_in(market, &auth).await?;
            api::respond(market.favorite_listings(Some(&user)).await)
        }
    };

    Ok(response)
}
