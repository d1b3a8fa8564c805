//! Error types for the revenue_store crate

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Project ids end up in file names, so they are restricted
    #[error("Invalid project id: {0:?}")]
    InvalidProject(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
