use rds_types::RecordId;

/// Errors from destination operations.
#[derive(Debug, thiserror::Error)]
pub enum DestinationError {
    /// No record is stored under this identifier.
    #[error("record not found: {0}")]
    NotFound(RecordId),

    /// A record is already stored under this identifier and overwrite was not requested.
    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),

    /// Missing or wrongly-typed configuration option.
    #[error("invalid destination configuration: {0}")]
    Config(String),

    /// The destination cannot be used (missing, wrong kind, no permissions).
    #[error("destination {location} is unusable: {reason}")]
    Unusable { location: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for destination operations.
pub type DestinationResult<T> = Result<T, DestinationError>;
