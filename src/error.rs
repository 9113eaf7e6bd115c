//! Error types for smart-search.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for smart-search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport errors talking to the suggestion backend (refused, timeout, DNS).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Backend answered but the answer was unusable (bad status, malformed body).
    #[error("API error: {0}")]
    Api(String),

    /// Configuration errors (invalid config file, bad base URL, bad script, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal setup, drawing or input errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an API error with the given message.
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a terminal error with the given message.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Api(_) => "API Error",
            Self::Config(_) => "Configuration Error",
            Self::Terminal(_) => "Terminal Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using SearchError.
pub type Result<T> = std::result::Result<T, SearchError>;
