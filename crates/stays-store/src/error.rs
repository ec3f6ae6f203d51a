use std::path::PathBuf;

use stays_models::RecordError;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O failure reading or writing the store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file exists but does not parse as a single JSON document.
    /// An empty file lands here: zero bytes are not a valid document.
    #[error("malformed store file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A parsed entry is structurally invalid (not an object, no type tag).
    #[error("invalid record at {key}: {reason}")]
    InvalidRecord { key: String, reason: String },

    /// Record conversion failed (unknown tag, bad fields, encode failure).
    #[error("record conversion failed at {key}: {source}")]
    Record {
        key: String,
        #[source]
        source: RecordError,
    },

    /// Failed to encode the in-memory mapping into a JSON document.
    #[error("failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
