use rds_types::Record;

use crate::error::FormatResult;

/// Encode/decode contract between record content and payload bytes.
///
/// Implementations must satisfy:
/// - `deserialize(serialize(r)) == r` for every record `r` that
///   `serialize` accepts.
/// - Serialization is deterministic: the same record always yields the same
///   bytes. Record identifiers are derived from these bytes.
/// - No side effects.
pub trait Format: Send + Sync {
    /// Registry name of this format.
    fn name(&self) -> &'static str;

    /// Encode a record. Fails if the record holds a value the format cannot
    /// represent.
    fn serialize(&self, record: &Record) -> FormatResult<Vec<u8>>;

    /// Decode a payload. Fails if the payload is malformed for this format.
    fn deserialize(&self, payload: &[u8]) -> FormatResult<Record>;
}
