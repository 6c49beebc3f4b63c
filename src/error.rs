// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unit enumeration found no usable listing structure (fatal)
    #[error("Enumeration error: {0}")]
    Enumeration(String),

    /// A single fetch failed (recoverable per entity)
    #[error("Fetch error for {context}: {message}")]
    Fetch { context: String, message: String },

    /// Checkpoint persistence failed (recoverable, logged)
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an enumeration error.
    pub fn enumeration(message: impl Into<String>) -> Self {
        Self::Enumeration(message.into())
    }

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a checkpoint error.
    pub fn checkpoint(message: impl fmt::Display) -> Self {
        Self::Checkpoint(message.to_string())
    }

    /// Whether this error should abort the entire run.
    ///
    /// Only a failed unit enumeration is fatal: without units there is
    /// nothing to crawl. Everything else is logged and the loop advances.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Enumeration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enumeration_is_fatal() {
        assert!(AppError::enumeration("no units").is_fatal());
        assert!(!AppError::fetch("entity 1001", "timeout").is_fatal());
        assert!(!AppError::checkpoint("disk full").is_fatal());
        assert!(!AppError::validation("bad field").is_fatal());
    }
}
