//! Error types for feature extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while turning a message into a feature record
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The message could not be parsed or traversed as claimed
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// A part's payload could not be retrieved
    #[error("Failed to retrieve part payload: {0}")]
    Payload(String),

    /// A required address header was absent or parsed to zero addresses
    #[error("No address found in required header: {0}")]
    MissingAddress(&'static str),

    /// The content-type count map could not be serialized
    #[error("Failed to encode content-type counts: {0}")]
    Json(#[from] serde_json::Error),

    /// A message file could not be read
    #[error("Failed to read message file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for feature-extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
