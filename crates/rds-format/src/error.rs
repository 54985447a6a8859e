/// Errors from format operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    /// The record holds a value this format has no encoding for.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The payload is malformed for this format.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Missing, unknown, or wrongly-typed configuration option.
    #[error("invalid format configuration: {0}")]
    Config(String),
}

/// Result alias for format operations.
pub type FormatResult<T> = Result<T, FormatError>;
