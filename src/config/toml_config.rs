use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    pub name: String,
    pub currency: String,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: "stay-market".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub session_max_age_seconds: Option<i64>,
    pub min_password_length: Option<usize>,
    /// bcrypt cost factor (4..=31)
    pub bcrypt_cost: Option<u32>,
    pub google: Option<OAuthProviderConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_max_age_seconds: Some(DEFAULT_SESSION_MAX_AGE_SECONDS),
            min_password_length: Some(DEFAULT_MIN_PASSWORD_LENGTH),
            bcrypt_cost: None,
            google: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: "./data/market.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            json: Some(false),
        }
    }
}

pub const DEFAULT_SESSION_MAX_AGE_SECONDS: i64 = 900;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MarketError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MarketError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AUTH_SECRET})；未設定的變數保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MarketError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("marketplace.name", &self.marketplace.name)?;

        let currency = &self.marketplace.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(MarketError::InvalidConfigValueError {
                field: "marketplace.currency".to_string(),
                value: currency.clone(),
                reason: "Expected a three-letter ISO 4217 code".to_string(),
            });
        }

        validation::validate_path("storage.data_path", &self.storage.data_path)?;

        validation::validate_positive_number(
            "auth.session_max_age_seconds",
            self.session_max_age_seconds(),
            60,
        )?;
        validation::validate_range(
            "auth.min_password_length",
            self.min_password_length(),
            1,
            128,
        )?;
        validation::validate_range("auth.bcrypt_cost", self.bcrypt_cost(), 4, 31)?;

        if let Some(google) = &self.auth.google {
            validation::validate_non_empty_string("auth.google.client_id", &google.client_id)?;
            validation::validate_non_empty_string(
                "auth.google.client_secret",
                &google.client_secret,
            )?;
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level = self.log_level();
        if !valid_levels.contains(&level) {
            return Err(MarketError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: level.to_string(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }

    pub fn data_path(&self) -> &str {
        &self.storage.data_path
    }

    pub fn session_max_age_seconds(&self) -> i64 {
        self.auth
            .session_max_age_seconds
            .unwrap_or(DEFAULT_SESSION_MAX_AGE_SECONDS)
    }

    pub fn min_password_length(&self) -> usize {
        self.auth
            .min_password_length
            .unwrap_or(DEFAULT_MIN_PASSWORD_LENGTH)
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.auth
            .bcrypt_cost
            .unwrap_or(crate::app::credentials::DEFAULT_COST)
    }

    pub fn currency(&self) -> &str {
        &self.marketplace.currency
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }

    /// 已設定 client 的 OAuth provider 名稱
    pub fn oauth_providers(&self) -> Vec<String> {
        let mut providers = Vec::new();
        if self.auth.google.is_some() {
            providers.push("google".to_string());
        }
        providers
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[marketplace]
name = "Seaside Stays"
currency = "EUR"

[auth]
session_max_age_seconds = 3600
min_password_length = 10

[storage]
data_path = "./test-data/market.json"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.marketplace.name, "Seaside Stays");
        assert_eq!(config.session_max_age_seconds(), 3600);
        assert_eq!(config.min_password_length(), 10);
        assert_eq!(config.log_level(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.data_path(), "./data/market.json");
        assert_eq!(config.session_max_age_seconds(), DEFAULT_SESSION_MAX_AGE_SECONDS);
        assert!(config.oauth_providers().is_empty());
        assert_eq!(config.bcrypt_cost(), 12);
        assert_eq!(config.currency(), "USD");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STAY_MARKET_TEST_GOOGLE_SECRET", "s3cr3t");

        let toml_content = r#"
[auth.google]
client_id = "market-client"
client_secret = "${STAY_MARKET_TEST_GOOGLE_SECRET}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        let google = config.auth.google.as_ref().unwrap();
        assert_eq!(google.client_secret, "s3cr3t");
        assert_eq!(config.oauth_providers(), vec!["google".to_string()]);

        std::env::remove_var("STAY_MARKET_TEST_GOOGLE_SECRET");
    }

    #[test]
    fn test_config_validation() {
        let bad_currency = r#"
[marketplace]
name = "test"
currency = "dollars"
"#;
        let config = AppConfig::from_toml_str(bad_currency).unwrap();
        assert!(config.validate().is_err());

        let bad_level = r#"
[logging]
level = "loud"
"#;
        let config = AppConfig::from_toml_str(bad_level).unwrap();
        assert!(config.validate().is_err());

        let empty_google = r#"
[auth.google]
client_id = ""
client_secret = "x"
"#;
        let config = AppConfig::from_toml_str(empty_google).unwrap();
        assert!(config.validate().is_err());

        let weak_cost = r#"
[auth]
bcrypt_cost = 2
"#;
        let config = AppConfig::from_toml_str(weak_cost).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[marketplace]
name = "file-test"
currency = "USD"

[storage]
data_path = "./output/market.json"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.marketplace.name, "file-test");
        assert_eq!(config.data_path(), "./output/market.json");
    }
}
