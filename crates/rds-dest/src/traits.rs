use rds_types::RecordId;

use crate::error::DestinationResult;

/// Lazy enumeration of every stored `(identifier, payload)` pair.
pub type PayloadIter<'a> = Box<dyn Iterator<Item = DestinationResult<(RecordId, Vec<u8>)>> + 'a>;

/// Store/retrieve/delete/enumerate contract over payloads keyed by identifier.
///
/// All implementations must satisfy these invariants:
/// - Identifiers are unique within one destination instance.
/// - `store(id, _, false)` fails with `AlreadyExists` when `id` is present
///   and leaves the stored payload untouched.
/// - `retrieve` and `delete` fail with `NotFound` when `id` is absent.
/// - Payloads come back byte-for-byte as stored.
/// - Enumeration order is unspecified.
pub trait Destination: Send + Sync {
    /// Registry name of this destination.
    fn name(&self) -> &'static str;

    /// Validate and prepare the destination (e.g. create the target directory).
    fn init(&self) -> DestinationResult<()>;

    /// Check whether a record is stored under `id`.
    fn exists(&self, id: &RecordId) -> DestinationResult<bool>;

    /// Write a payload under `id`, replacing any existing one only when
    /// `overwrite` is set.
    fn store(&self, id: &RecordId, payload: &[u8], overwrite: bool) -> DestinationResult<()>;

    /// Read the payload stored under `id`.
    fn retrieve(&self, id: &RecordId) -> DestinationResult<Vec<u8>>;

    /// Remove the payload stored under `id`.
    fn delete(&self, id: &RecordId) -> DestinationResult<()>;

    /// Enumerate all stored records.
    fn retrieve_all(&self) -> DestinationResult<PayloadIter<'_>>;
}
