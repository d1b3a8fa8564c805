//! # Revenue Math
//!
//! Statistical helpers shared by the revenue forecasting engine.
//! Every function here is pure and guards its divisions: an undefined
//! ratio comes back as `None` instead of `NaN` or infinity.

use thiserror::Error;

pub mod rolling;
pub mod statistics;

pub use rolling::RollingMean;
pub use statistics::{
    capped_coefficient_of_variation, coefficient_of_variation, mean, pct_change,
    population_std_dev, safe_ratio,
};

/// Errors that can occur in revenue calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for revenue math operations
pub type Result<T> = std::result::Result<T, MathError>;
