//! Error types for Shippr

use thiserror::Error;

use crate::api::ApiError;

/// Result type alias using Shippr's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Shippr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential file error
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Classified API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal setup or drawing failed
    #[error("Terminal error: {0}")]
    Tui(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a terminal error
    pub fn tui(msg: impl std::fmt::Display) -> Self {
        Self::Tui(msg.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
