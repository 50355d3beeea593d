//! Error handling for the ScopeView application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application. Frequency estimation has no error type:
//! its degraded outcomes are values of
//! [`FrequencyEstimate`](crate::analysis::FrequencyEstimate).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading an oscilloscope CSV export
#[derive(Error, Debug)]
pub enum ParseError {
    /// The data section marker was required but never found
    #[error("marker '{marker}' not found")]
    MissingDataMarker { marker: &'static str },

    /// The export could not be read from disk
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to session files
#[derive(Error, Debug)]
pub enum SessionError {
    /// Malformed or unserializable session JSON
    #[error("session JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session file could not be read or written
    #[error("session IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A channel record whose arrays disagree in length
    #[error("channel {channel}: {time} time samples but {voltage} voltage samples")]
    LengthMismatch {
        channel: String,
        time: usize,
        voltage: usize,
    },
}

/// Errors related to the point export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Neither channel holds data
    #[error("no channel data loaded")]
    NothingToExport,

    /// Output could not be written
    #[error("export IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for ScopeView operations
#[derive(Error, Debug)]
pub enum ScopeViewError {
    /// Errors from the CSV parser
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Errors from session save/load
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Errors from the point export
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Errors related to math overlay formulas
    #[error("Overlay error: {0}")]
    Overlay(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScopeViewError>,
    },
}

impl ScopeViewError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScopeViewError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an overlay error from a Rhai error
    pub fn from_rhai_error(err: Box<rhai::EvalAltResult>) -> Self {
        ScopeViewError::Overlay(err.to_string())
    }
}

/// Result type alias for ScopeView operations
pub type Result<T> = std::result::Result<T, ScopeViewError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ScopeViewError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ScopeViewError = e.into();
            err.with_context(context)
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ScopeViewError = e.into();
            err.with_context(f())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScopeViewError::Overlay("unknown function".to_string());
        assert_eq!(err.to_string(), "Overlay error: unknown function");
    }

    #[test]
    fn test_missing_marker_display() {
        let err: ScopeViewError = ParseError::MissingDataMarker {
            marker: "Waveform Data",
        }
        .into();
        assert_eq!(err.to_string(), "Parse error: marker 'Waveform Data' not found");
    }

    #[test]
    fn test_error_with_context() {
        let result: std::result::Result<(), ExportError> = Err(ExportError::NothingToExport);
        let err = result.context("Failed to export points").unwrap_err();
        assert!(err.to_string().contains("Failed to export points"));
        assert!(err.to_string().contains("no channel data loaded"));
    }

    #[test]
    fn test_length_mismatch_error() {
        let err = SessionError::LengthMismatch {
            channel: "CH1".to_string(),
            time: 10,
            voltage: 9,
        };
        assert!(err.to_string().contains("CH1"));
        assert!(err.to_string().contains("10 time samples"));
    }
}
