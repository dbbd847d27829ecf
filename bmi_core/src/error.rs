//! Error types for the bmi_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bmi_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A measurement or BMI value the classifier cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The history ledger grew past its capacity after an insert
    #[error("History ledger holds {len} records but capacity is {capacity}")]
    CapacityInvariantViolation { len: usize, capacity: usize },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report export error
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Shorthand for building an `InvalidInput` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
