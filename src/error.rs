//! Error types for message normalization

use thiserror::Error;

/// Reasons a message is discarded or a batch cannot be encoded
#[derive(Error, Debug)]
pub enum IndexError {
    /// Failed to parse the raw message structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// No message identifier, so the record cannot be indexed
    #[error("Missing required header: message-id")]
    MissingIdentifier,

    /// Date header present but not a usable timestamp
    #[error("Unparsable date header: {0}")]
    UnparsableTimestamp(String),

    /// Failed to encode a record for the bulk payload
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid configuration text
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for indexing operations
pub type Result<T> = std::result::Result<T, IndexError>;
