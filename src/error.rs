//! Unified error handling for the carelens crate
//!
//! This module provides a unified error type that wraps the analytics
//! errors together with the I/O and parsing failures of the surrounding
//! loading and configuration code.
//!
//! # Architecture
//!
//! - [`ClassifyError`] - Common interface for error classification
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum
//!
//! # Usage
//!
//! ```rust,ignore
//! use carelens::error::{ClassifyError, Error, ErrorCategory};
//!
//! fn report(err: &Error) {
//!     match err.category() {
//!         ErrorCategory::InvalidInput => eprintln!("Bad data: {err}"),
//!         ErrorCategory::Configuration => eprintln!("Bad config: {err}"),
//!         _ => eprintln!("Error: {err}"),
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::analytics::error::{AnalyticsError, ErrorKind};

/// Common trait for carelens error types
pub trait ClassifyError: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input records cannot support the requested computation
    InvalidInput,
    /// Configuration and validation errors
    Configuration,
    /// File and I/O errors
    Storage,
    /// JSON / TOML decoding errors
    Parsing,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short description for user-facing messages
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid input",
            Self::Configuration => "configuration error",
            Self::Storage => "storage error",
            Self::Parsing => "parse error",
            Self::Other => "error",
        }
    }
}

impl ClassifyError for AnalyticsError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::InvalidInput => ErrorCategory::InvalidInput,
            ErrorKind::Configuration => ErrorCategory::Configuration,
        }
    }
}

/// Unified error type for the carelens crate
#[derive(Error, Debug)]
pub enum Error {
    /// Tagging, aggregation and ranking errors
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ClassifyError for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Analytics(e) => e.is_recoverable(),
            Self::Io(_) => true, // I/O errors are often transient
            Self::Json(_) | Self::Toml(_) | Self::Config(_) | Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Analytics(e) => e.category(),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) | Self::Toml(_) => ErrorCategory::Parsing,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::from(AnalyticsError::EmptyVocabulary);
        assert_eq!(err.category(), ErrorCategory::Configuration);

        let err = Error::from(AnalyticsError::NoTargetRecords {
            target: "Alpha".to_string(),
        });
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_is_recoverable() {
        let io_err = Error::Io(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        assert!(io_err.is_recoverable());
        assert_eq!(io_err.category(), ErrorCategory::Storage);

        let err = Error::from(AnalyticsError::InvalidTopN(0));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_json_error_is_parsing() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.category(), ErrorCategory::Parsing);
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("threshold must be numeric");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.to_string(), "Config error: threshold must be numeric");
    }

    #[test]
    fn test_other_error() {
        let err = Error::with_source(
            "Failed to load records",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.category(), ErrorCategory::Other);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_category_description() {
        assert_eq!(ErrorCategory::InvalidInput.description(), "invalid input");
    }
}
