//! Error types for mealplanner
//!
//! One error enum shared by the store, the services and both front ends
//! (CLI and HTTP API).

use thiserror::Error;

/// Main error type for meal planning operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Meal form failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Malformed user input (dates, slots, ingredient lines)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record store rejected or failed an operation
    #[error("Record store error: {0}")]
    Store(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Convert anyhow errors to PlannerError
impl From<anyhow::Error> for PlannerError {
    fn from(err: anyhow::Error) -> Self {
        PlannerError::Generic(err.to_string())
    }
}
