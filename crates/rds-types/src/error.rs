use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id {id:?}: {reason}")]
    InvalidRecordId { id: String, reason: &'static str },

    #[error("record must be a mapping, got {0}")]
    NotAMapping(&'static str),
}

pub type TypeResult<T> = Result<T, TypeError>;
