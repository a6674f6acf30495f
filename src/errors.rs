use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid loan spec: {message}")]
    InvalidLoanSpec {
        message: String,
    },

    #[error("schedule did not terminate: {periods} periods produced, {remaining} still outstanding")]
    NonTerminatingSchedule {
        periods: u32,
        remaining: Money,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid purchase: {message}")]
    InvalidPurchase {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScheduleError {
    pub(crate) fn invalid_spec(message: impl Into<String>) -> Self {
        ScheduleError::InvalidLoanSpec {
            message: message.into(),
        }
    }

    pub(crate) fn calculation(message: impl Into<String>) -> Self {
        ScheduleError::CalculationError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
