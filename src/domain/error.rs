use chrono::NaiveDate;
use thiserror::Error;

/// 住宿日期與計價的驗證錯誤（純函式，不涉及 I/O，不重試）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StayError {
    #[error("Invalid stay range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid pricing input: {reason}")]
    InvalidPricingInput { reason: String },
}

impl StayError {
    pub fn pricing(reason: impl Into<String>) -> Self {
        Self::InvalidPricingInput {
            reason: reason.into(),
        }
    }
}
