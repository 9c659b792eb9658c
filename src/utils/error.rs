use crate::domain::error::StayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error(transparent)]
    Stay(#[from] StayError),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not allowed: {message}")]
    Forbidden { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Listing {listing_id} is already booked for {window}")]
    Unavailable { listing_id: String, window: String },

    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid config value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHashError(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Auth,
    Conflict,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketError::Stay(_)
            | MarketError::ValidationError { .. }
            | MarketError::NotFound { .. } => ErrorCategory::Input,
            MarketError::Unauthorized
            | MarketError::InvalidCredentials
            | MarketError::Forbidden { .. } => ErrorCategory::Auth,
            MarketError::Unavailable { .. } | MarketError::AlreadyExists { .. } => {
                ErrorCategory::Conflict
            }
            MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. }
            | MarketError::PasswordHashError(_) => ErrorCategory::Configuration,
            MarketError::IoError(_) | MarketError::SerializationError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Conflict => ErrorSeverity::Medium,
            ErrorCategory::Auth => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// HTTP status for the JSON API mapping.
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::Stay(_) | MarketError::ValidationError { .. } => 400,
            MarketError::Unauthorized | MarketError::InvalidCredentials => 401,
            MarketError::Forbidden { .. } => 403,
            MarketError::NotFound { .. } => 404,
            MarketError::Unavailable { .. } | MarketError::AlreadyExists { .. } => 409,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MarketError::Stay(StayError::InvalidRange { .. }) => {
                "Pick a check-out date on or after the check-in date"
            }
            MarketError::Stay(StayError::InvalidPricingInput { .. }) => {
                "Set a nightly price greater than zero"
            }
            MarketError::Unauthorized => "Sign in and try again",
            MarketError::InvalidCredentials => "Check the email and password",
            MarketError::Forbidden { .. } => "Use a sign-in method this marketplace has enabled",
            MarketError::NotFound { .. } => "Refresh and pick an existing item",
            MarketError::Unavailable { .. } => "Choose dates that are not already booked",
            MarketError::AlreadyExists { .. } => "Use a different value or sign in instead",
            MarketError::ValidationError { .. } => "Correct the highlighted input",
            MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. } => "Fix the configuration file",
            MarketError::PasswordHashError(_) => "Set auth.bcrypt_cost between 4 and 31",
            MarketError::IoError(_) => "Check that the data path exists and is writable",
            MarketError::SerializationError(_) => "Check that the data file is valid JSON",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MarketError::Stay(e) => e.to_string(),
            MarketError::IoError(_) | MarketError::SerializationError(_) => {
                "Something went wrong while accessing stored data".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
