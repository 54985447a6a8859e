use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use rds_types::{ConfigMap, RecordId};

use crate::error::{DestinationError, DestinationResult};
use crate::registry::check_options;
use crate::traits::{Destination, PayloadIter};

/// In-memory, HashMap-based destination.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock` and
/// cloned on read/write. Nothing survives the process.
pub struct InMemoryDestination {
    records: RwLock<HashMap<RecordId, Vec<u8>>>,
}

impl InMemoryDestination {
    pub const NAME: &'static str = "memory";

    /// Create a new empty destination.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn template() -> ConfigMap {
        ConfigMap::new()
    }

    pub fn from_config(config: &ConfigMap) -> DestinationResult<Self> {
        check_options(config, &[])?;
        Ok(Self::new())
    }

    pub fn boxed(config: &ConfigMap) -> DestinationResult<Box<dyn Destination>> {
        Ok(Box::new(Self::from_config(config)?))
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes across all records.
    pub fn total_bytes(&self) -> u64 {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|payload| payload.len() as u64)
            .sum()
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for InMemoryDestination {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self) -> DestinationResult<()> {
        Ok(())
    }

    fn exists(&self, id: &RecordId) -> DestinationResult<bool> {
        let map = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.contains_key(id))
    }

    fn store(&self, id: &RecordId, payload: &[u8], overwrite: bool) -> DestinationResult<()> {
        let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match map.entry(id.clone()) {
            Entry::Occupied(_) if !overwrite => Err(DestinationError::AlreadyExists(id.clone())),
            Entry::Occupied(mut slot) => {
                slot.insert(payload.to_vec());
                Ok(())
            }
            Entry::Vacant(slot) => {
                slot.insert(payload.to_vec());
                Ok(())
            }
        }
    }

    fn retrieve(&self, id: &RecordId) -> DestinationResult<Vec<u8>> {
        let map = self.records.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id)
            .cloned()
            .ok_or_else(|| DestinationError::NotFound(id.clone()))
    }

    fn delete(&self, id: &RecordId) -> DestinationResult<()> {
        let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
        map.remove(id)
            .map(|_| ())
            .ok_or_else(|| DestinationError::NotFound(id.clone()))
    }

    fn retrieve_all(&self) -> DestinationResult<PayloadIter<'_>> {
        // Snapshot so the lock is not held while the caller iterates.
        let snapshot: Vec<(RecordId, Vec<u8>)> = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, payload)| (id.clone(), payload.clone()))
            .collect();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }
}

impl std::fmt::Debug for InMemoryDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDestination")
            .field("record_count", &self.len())
            .finish()
    }
}
