//! Error types for the muninn library.
//!
//! This module provides structured error handling for all muninn operations,
//! preserving context so that configuration and I/O failures surface with
//! enough detail to act on.

use std::io;

use thiserror::Error;

/// Main result type for muninn operations.
pub type Result<T> = std::result::Result<T, MuninnError>;

/// Comprehensive error type for all muninn operations.
#[derive(Error, Debug)]
pub enum MuninnError {
    /// I/O related errors (dictionary files, document files, report output)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Dictionary construction and lookup errors
    #[error("Dictionary error: {message}")]
    Dictionary {
        /// Error description
        message: String,
        /// Entity id involved, when known
        entity_id: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl MuninnError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new dictionary error
    pub fn dictionary(message: impl Into<String>) -> Self {
        Self::Dictionary {
            message: message.into(),
            entity_id: None,
        }
    }

    /// Create a new dictionary error naming the offending entity
    pub fn dictionary_entity(message: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::Dictionary {
            message: message.into(),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Implement From traits for common error types
impl From<io::Error> for MuninnError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for MuninnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for MuninnError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}
