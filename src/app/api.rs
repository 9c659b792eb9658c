//! JSON request bodies and response mapping for an HTTP front end.

use crate::app::reservations::ReservationDraft;
use crate::core::search::parse_date;
use crate::domain::model::{StayWindow, User, UserProfile};
use crate::utils::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub listing_id: String,
    pub start_date: String,
    pub end_date: String,
    pub total_price: Option<i64>,
}

impl TryFrom<CreateReservationRequest> for ReservationDraft {
    type Error = MarketError;

    fn try_from(request: CreateReservationRequest) -> Result<Self> {
        let listing_id = parse_id("listingId", &request.listing_id)?;
        let window = StayWindow::new(
            parse_date("startDate", &request.start_date)?,
            parse_date("endDate", &request.end_date)?,
        )?;
        Ok(Self {
            listing_id,
            window,
            total_price: request.total_price,
        })
    }
}

/// prisma `deleteMany` 風格的回應
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::from_error(&MarketError::SerializationError(e)),
        }
    }

    pub fn from_error(error: &MarketError) -> Self {
        let status = error.status_code();
        if status >= 500 {
            tracing::error!("Request failed: {} (Category: {:?})", error, error.category());
        } else {
            tracing::debug!("Request rejected: {}", error);
        }

        Self {
            status,
            body: json!({
                "error": error.user_friendly_message(),
                "suggestion": error.recovery_suggestion(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub fn respond<T: Serialize>(result: Result<T>) -> ApiResponse {
    match result {
        Ok(value) => ApiResponse::ok(&value),
        Err(e) => ApiResponse::from_error(&e),
    }
}

/// Users are returned without their password hash.
pub fn respond_user(result: Result<User>) -> ApiResponse {
    respond(result.map(|user| UserProfile::from(&user)))
}

pub fn respond_deleted(result: Result<u64>) -> ApiResponse {
    respond(result.map(|count| DeleteResult { count }))
}

pub fn parse_id(field_name: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        MarketError::validation(format!("{} is not a valid id: {}", field_name, value))
    })
}
