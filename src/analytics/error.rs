//! Error types for the analytics module
//!
//! Every failure is classified as either bad input data or bad
//! configuration, so callers can tell the two apart without string
//! matching.

use thiserror::Error;

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Broad classification of analytics failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The records handed in cannot support the computation
    InvalidInput,
    /// The options the computation was configured with are unusable
    Configuration,
}

/// Errors raised by the tagging, aggregation and ranking operations
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Vocabulary must contain at least one term")]
    EmptyVocabulary,

    #[error("Vocabulary term at position {index} is blank")]
    BlankVocabularyTerm { index: usize },

    #[error("Invalid top-N value: {0} (must be greater than 0)")]
    InvalidTopN(usize),

    #[error("Invalid divergence threshold: {0} (must be within [0, 2])")]
    InvalidThreshold(f64),

    #[error("Invalid sentiment tolerance: {0} (must be within [0, 1])")]
    InvalidTolerance(f64),

    #[error("Invalid identity pattern '{pattern}': {source}")]
    InvalidIdentityPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Target entity name must not be blank")]
    BlankTargetName,

    #[error(
        "{out_of_range} of {total} sentiment values fall outside [-1, 1] (tolerance {tolerance})"
    )]
    SentimentOutOfRange {
        out_of_range: usize,
        total: usize,
        tolerance: f64,
    },

    #[error("No records belong to target entity '{target}'")]
    NoTargetRecords { target: String },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Malformed date: '{value}'")]
    MalformedDate { value: String },
}

impl AnalyticsError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyVocabulary
            | Self::BlankVocabularyTerm { .. }
            | Self::InvalidTopN(_)
            | Self::InvalidThreshold(_)
            | Self::InvalidTolerance(_)
            | Self::InvalidIdentityPattern { .. }
            | Self::BlankTargetName => ErrorKind::Configuration,
            Self::SentimentOutOfRange { .. }
            | Self::NoTargetRecords { .. }
            | Self::MissingField { .. }
            | Self::MalformedDate { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Shorthand for `kind() == ErrorKind::InvalidInput`
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_kinds() {
        assert_eq!(AnalyticsError::EmptyVocabulary.kind(), ErrorKind::Configuration);
        assert_eq!(AnalyticsError::InvalidTopN(0).kind(), ErrorKind::Configuration);
        assert_eq!(
            AnalyticsError::InvalidThreshold(2.5).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_invalid_input_kinds() {
        let err = AnalyticsError::NoTargetRecords {
            target: "Health System Alpha".to_string(),
        };
        assert!(err.is_invalid_input());

        let err = AnalyticsError::MalformedDate {
            value: "yesterday".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::SentimentOutOfRange {
            out_of_range: 3,
            total: 10,
            tolerance: 0.05,
        };
        assert_eq!(
            err.to_string(),
            "3 of 10 sentiment values fall outside [-1, 1] (tolerance 0.05)"
        );
    }
}
