//! Error types for parsing and dataset operations.
//!
//! This module defines [`EdinetError`] which covers the error cases that can
//! occur when reading a filing export, assembling a document, or building
//! dataset records from it.

use thiserror::Error;

/// Errors that can occur while reading and parsing filings.
#[derive(Error, Debug)]
pub enum EdinetError {
    /// Filesystem errors (missing file, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(String),

    /// The export could not be decoded with the expected text encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The export was decoded but its table structure is invalid.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A required column is absent from the export header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The requested document or reference entry was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error serializing or deserializing a document or record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A worker task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for EdinetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EdinetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result type alias using [`EdinetError`].
pub type Result<T> = std::result::Result<T, EdinetError>;
