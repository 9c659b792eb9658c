use crate::config::toml_config::AppConfig;
use crate::domain::model::User;
use crate::domain::ports::MarketStore;
use crate::utils::error::{MarketError, Result};
use chrono::Duration;

/// Marketplace 行為設定，由 `AppConfig` 產生
#[derive(Debug, Clone)]
pub struct MarketSettings {
    pub session_max_age: Duration,
    pub min_password_length: usize,
    pub bcrypt_cost: u32,
    /// 報價與訂房記錄使用的幣別
    pub currency: String,
    /// 允許登入的 OAuth provider
    pub oauth_providers: Vec<String>,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for MarketSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            session_max_age: Duration::seconds(config.session_max_age_seconds()),
            min_password_length: config.min_password_length(),
            bcrypt_cost: config.bcrypt_cost(),
            currency: config.currency().to_string(),
            oauth_providers: config.oauth_providers(),
        }
    }
}

/// Request handlers for the marketplace.
///
/// The store is injected at construction and the acting user is passed to
/// every handler that needs one; nothing is read from process-wide state.
/// Handlers live in `accounts`, `listings`, `reservations` and `favorites`.
pub struct Marketplace<S: MarketStore> {
    pub(crate) store: S,
    pub(crate) settings: MarketSettings,
}

impl<S: MarketStore> Marketplace<S> {
    pub fn new(store: S) -> Self {
        Self::with_settings(store, MarketSettings::default())
    }

    pub fn with_settings(store: S, settings: MarketSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &MarketSettings {
        &self.settings
    }

    /// 需要登入的操作；未登入回傳 `Unauthorized`
    pub(crate) fn require_actor<'a>(&self, actor: Option<&'a User>) -> Result<&'a User> {
        actor.ok_or(MarketError::Unauthorized)
    }
}
