use rds_dest::DestinationError;
use rds_format::FormatError;
use rds_types::{RecordId, TypeError};
use thiserror::Error;

/// Root error for every data store operation.
#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("record not found: {0}")]
    NotFound(RecordId),

    #[error("record already exists: {0}")]
    AlreadyExists(RecordId),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("destination error: {0}")]
    Destination(DestinationError),

    /// Caller-supplied value rejected by `rds-types`, e.g. a malformed
    /// identifier passed through `RecordId::new(raw)?`.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    #[error("unsupported format \"{0}\"")]
    UnsupportedFormat(String),

    #[error("unsupported destination \"{0}\"")]
    UnsupportedDestination(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DataStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }
}

// Lift the two policy-relevant destination failures to the top level so
// callers match them the same way whichever destination is bound.
impl From<DestinationError> for DataStoreError {
    fn from(e: DestinationError) -> Self {
        match e {
            DestinationError::NotFound(id) => Self::NotFound(id),
            DestinationError::AlreadyExists(id) => Self::AlreadyExists(id),
            other => Self::Destination(other),
        }
    }
}

pub type DataStoreResult<T> = Result<T, DataStoreError>;
