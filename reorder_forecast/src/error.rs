//! Error types for the reorder_forecast crate

use thiserror::Error;

/// Custom error types for the reorder_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Configuration value outside its valid range; raised before any
    /// computation starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error related to purchase data validation or processing
    #[error("Data error: {0}")]
    Data(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<invoice_data::DataError> for ForecastError {
    fn from(err: invoice_data::DataError) -> Self {
        ForecastError::Data(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}
