use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "stay-market")]
#[command(about = "Search, price and book vacation rentals")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override storage.data_path from config
    #[arg(long)]
    pub data_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct Credentials {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account with email and password
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },

    /// Publish a new listing
    List {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_src: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "1")]
        rooms: u32,
        #[arg(long, default_value = "1")]
        bathrooms: u32,
        #[arg(long, default_value = "1")]
        guests: u32,
        #[arg(long)]
        location: String,
        /// Nightly rate
        #[arg(long)]
        price: i64,
    },

    /// Search listings, optionally excluding ones booked in a date window
    Search {
        #[arg(long)]
        guests: Option<u32>,
        #[arg(long)]
        rooms: Option<u32>,
        #[arg(long)]
        bathrooms: Option<u32>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },

    /// Show a listing with its host and booked dates
    Show {
        #[arg(long)]
        listing: String,
    },

    /// Price a stay without booking it
    Quote {
        #[arg(long)]
        listing: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Book a stay
    Reserve {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        listing: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Expected total; rejected if it differs from the computed price
        #[arg(long)]
        total_price: Option<i64>,
    },

    /// Cancel a reservation as its guest or host
    Cancel {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        reservation: String,
    },

    /// Reservations made by the signed-in user
    Trips {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Reservations on the signed-in user's listings
    Reservations {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Listings owned by the signed-in user
    Properties {
        #[command(flatten)]
        auth: Credentials,
    },

    /// Delete one of the signed-in user's listings
    Unlist {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        listing: String,
    },

    /// Add a listing to favorites
    Favorite {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        listing: String,
    },

    /// Remove a listing from favorites
    Unfavorite {
        #[command(flatten)]
        auth: Credentials,
        #[arg(long)]
        listing: String,
    },

    /// Favorite listings of the signed-in user
    Favorites {
        #[command(flatten)]
        auth: Credentials,
    },
}

impl Command {
    /// 會修改資料、需要寫回資料檔的指令
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Register { .. }
                | Command::List { .. }
                | Command::Reserve { .. }
                | Command::Cancel { .. }
                | Command::Unlist { .. }
                | Command::Favorite { .. }
                | Command::Unfavorite { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserve_command() {
        let cli = CliConfig::try_parse_from([
            "stay-market",
            "--data-path",
            "/tmp/market.json",
            "reserve",
            "--email",
            "guest@example.com",
            "--password",
            "hunter22",
            "--listing",
            "6f1c1f2e-5b7a-4e8e-9a55-3a0f0a0c9b11",
            "--start",
            "2024-06-01",
            "--end",
            "2024-06-04",
        ])
        .unwrap();

        assert_eq!(cli.data_path.as_deref(), Some("/tmp/market.json"));
        assert!(cli.command.mutates());
        match cli.command {
            Command::Reserve { auth, total_price, .. } => {
                assert_eq!(auth.email, "guest@example.com");
                assert_eq!(total_price, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_is_read_only() {
        let cli = CliConfig::try_parse_from(["stay-market", "search", "--guests", "2"]).unwrap();
        assert!(!cli.command.mutates());
    }
}
