//! Error types for the Quotesync engine.

use thiserror::Error;

/// All possible errors from the Quotesync engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("empty field: {0}")]
    EmptyField(&'static str),

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    // Import errors
    #[error("invalid import: {0}")]
    InvalidImport(String),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
