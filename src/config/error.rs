//! Error types for battle data loading.

use thiserror::Error;

/// Errors that can occur when loading or validating battle data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A value is outside the range the simulation accepts.
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
}
