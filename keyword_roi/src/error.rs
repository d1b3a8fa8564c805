//! Error types for the keyword_roi crate

use revenue_forecast::ForecastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A range whose end precedes its start
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;

impl From<ForecastError> for RoiError {
    fn from(err: ForecastError) -> Self {
        RoiError::ParseError(err.to_string())
    }
}
