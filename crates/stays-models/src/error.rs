/// Errors from record conversion and construction.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record did not serialize to a JSON object.
    #[error("record did not serialize to an object")]
    NotAnObject,

    /// The type tag is not present in the registry.
    #[error("unknown record type: {0}")]
    UnknownType(String),

    /// Failed to encode a record into a field-map.
    #[error("failed to encode record fields: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode a record from a field-map.
    #[error("failed to decode record fields: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result alias for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
