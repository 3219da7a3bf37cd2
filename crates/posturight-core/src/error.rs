//! Error types for the PostuRight tracker.
//!
//! The per-frame state machine never fails: missing angles, unknown
//! exercises, low classifier confidence and debounce rejections are all
//! modelled as data. The errors here cover the surfaces around it, namely
//! configuration loading and frame-trace parsing.

use std::path::PathBuf;

/// A specialized `Result` type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while preparing or feeding a tracking session.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your posturight.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Frame Trace Errors
    // ========================================================================
    /// Frame trace file was not found.
    #[error("Frame trace not found: '{path}'\n\nSuggestion: Check the trace path passed on the command line")]
    TraceNotFound {
        /// Path where the trace was expected.
        path: PathBuf,
    },

    /// A line of the frame trace could not be parsed.
    #[error("Invalid frame record in '{path}' at line {line}: {message}\n\nSuggestion: Each line must be a JSON object with an \"angles\" map")]
    TraceParseError {
        /// Path to the trace file.
        path: PathBuf,
        /// 1-indexed line number of the bad record.
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `TraceNotFound` error.
    #[must_use]
    pub fn trace_not_found(path: impl Into<PathBuf>) -> Self {
        Self::TraceNotFound { path: path.into() }
    }

    /// Creates a new `TraceParseError`.
    #[must_use]
    pub fn trace_parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::TraceParseError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Returns `true` if the error stems from user-supplied configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. } | Self::ConfigValidationError { .. }
        )
    }
}
