//! Error type definitions for the M3U filter
//!
//! Parsing and matching are permissive: a missing tag is an empty string and
//! a non-matching rule is `false`. The only failure the filtering core raises
//! itself is an invalid name pattern. Source failures are raised at the input
//! boundary by the loaders in [`crate::sources`].

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Structurally impossible playlist input. The parser currently never
    /// raises this; unrecognised lines are skipped.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Invalid name pattern in a filter specification
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A playlist or filter-spec source could not be read
    #[error("Missing source: {source_id} - {message}")]
    MissingSource { source_id: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A name pattern that the matcher could not compile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid name pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

impl PatternError {
    pub fn new<P: Into<String>, M: Into<String>>(pattern: P, message: M) -> Self {
        Self {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a parse error with a custom message
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a missing source error for a playlist or spec location
    pub fn missing_source<S: Into<String>, M: Into<String>>(source_id: S, message: M) -> Self {
        Self::MissingSource {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error came from the input boundary
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::MissingSource { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_error_converts_transparently() {
        let err: AppError = PatternError::new("(", "unclosed group").into();
        assert!(matches!(err, AppError::Pattern(_)));
        assert_eq!(err.to_string(), "Invalid name pattern '(': unclosed group");
    }

    #[test]
    fn test_missing_source_display() {
        let err = AppError::missing_source("KY.m3u", "No such file or directory");
        assert!(err.is_missing_source());
        assert_eq!(
            err.to_string(),
            "Missing source: KY.m3u - No such file or directory"
        );
    }
}
