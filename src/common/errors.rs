//! Error types for the application

use thiserror::Error;

/// Result type alias using our BotError
pub type Result<T> = std::result::Result<T, BotError>;

/// Main error type for bot operations
#[derive(Error, Debug)]
pub enum BotError {
    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A trade side that is neither buy nor sell
    #[error("Invalid trade side: {0}")]
    InvalidSide(String),

    /// A trade proposal that violates its construction rules
    #[error("Invalid trade proposal: {0}")]
    InvalidProposal(String),

    /// Failure while sizing or booking a trade
    #[error("Execution error: {0}")]
    Execution(String),

    /// Operator notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
