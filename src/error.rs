//! Error types for storage2md.
//!
//! Defects in the markup itself never surface here; they degrade into
//! placeholder output. Only caller mistakes and I/O around the core do.

use thiserror::Error;

/// Result type for storage2md operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// A required record field was not supplied by the caller.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error occurred during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input or output JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
