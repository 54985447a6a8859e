use std::collections::BTreeMap;

use rds_dest::{lookup_destination, Destination, DestinationError};
use rds_format::{lookup_format, Format};
use rds_types::{ConfigMap, QueryFilter, Record, RecordId};
use tracing::{debug, info, warn};

use crate::config::DataStoreConfig;
use crate::error::{DataStoreError, DataStoreResult};
use crate::query::Pagination;

/// CRUD and query over one bound format and one bound destination.
///
/// The store holds no state of its own between calls; everything durable
/// lives behind the destination. Operations are synchronous and independent:
/// there is no locking and no atomicity across calls, so concurrent writers
/// sharing a destination must coordinate externally.
pub struct DataStore {
    format: Box<dyn Format>,
    destination: Box<dyn Destination>,
}

impl DataStore {
    /// Bind already-built capabilities and initialize the destination.
    pub fn new(
        format: Box<dyn Format>,
        destination: Box<dyn Destination>,
    ) -> DataStoreResult<Self> {
        destination.init()?;
        info!(
            format = format.name(),
            destination = destination.name(),
            "data store opened"
        );
        Ok(Self {
            format,
            destination,
        })
    }

    /// Resolve capabilities by registry name, build them from their
    /// configuration, and initialize the destination.
    pub fn open(
        format_name: &str,
        format_conf: &ConfigMap,
        destination_name: &str,
        destination_conf: &ConfigMap,
    ) -> DataStoreResult<Self> {
        let format_entry = lookup_format(format_name)
            .ok_or_else(|| DataStoreError::UnsupportedFormat(format_name.to_string()))?;
        let destination_entry = lookup_destination(destination_name)
            .ok_or_else(|| DataStoreError::UnsupportedDestination(destination_name.to_string()))?;
        let format = (format_entry.build)(format_conf)?;
        let destination = (destination_entry.build)(destination_conf)?;
        Self::new(format, destination)
    }

    pub fn from_config(config: &DataStoreConfig) -> DataStoreResult<Self> {
        Self::open(
            &config.format_name,
            &config.format_conf,
            &config.destination_name,
            &config.destination_conf,
        )
    }

    pub fn format_name(&self) -> &'static str {
        self.format.name()
    }

    pub fn destination_name(&self) -> &'static str {
        self.destination.name()
    }

    /// Store a new record and return its identifier.
    ///
    /// The identifier is derived from the serialized payload, so content
    /// that serializes identically to a stored record maps to the same
    /// identifier. That collision fails with `AlreadyExists` and leaves the
    /// stored record untouched unless `overwrite` is set.
    pub fn insert(&self, record: &Record, overwrite: bool) -> DataStoreResult<RecordId> {
        let payload = self.format.serialize(record)?;
        let id = RecordId::derive(&payload);
        self.destination.store(&id, &payload, overwrite)?;
        debug!(id = %id.short_id(), len = payload.len(), overwrite, "inserted record");
        Ok(id)
    }

    /// Insert each record independently.
    ///
    /// Stops at the first failure and returns it. Records inserted before
    /// the failure stay committed; there is no rollback.
    pub fn insert_many<I>(
        &self,
        records: I,
        overwrite: bool,
    ) -> DataStoreResult<BTreeMap<RecordId, Record>>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut inserted = BTreeMap::new();
        for record in records {
            let id = self.insert(&record, overwrite).inspect_err(|e| {
                warn!(committed = inserted.len(), error = %e, "batch insert stopped");
            })?;
            inserted.insert(id, record);
        }
        debug!(count = inserted.len(), "inserted batch");
        Ok(inserted)
    }

    /// Fetch and decode one record.
    pub fn find(&self, id: &RecordId) -> DataStoreResult<Record> {
        let payload = self.destination.retrieve(id)?;
        self.decode(id, &payload)
    }

    /// Replace a record's content, keeping its identifier.
    ///
    /// An absent identifier fails with `NotFound`, or is created under that
    /// exact identifier when `upsert` is set. The identifier is never
    /// re-derived from the new content.
    pub fn update(
        &self,
        id: &RecordId,
        record: &Record,
        upsert: bool,
    ) -> DataStoreResult<RecordId> {
        let existed = self.destination.exists(id)?;
        if !existed && !upsert {
            return Err(DataStoreError::NotFound(id.clone()));
        }
        let payload = self.format.serialize(record)?;
        self.destination.store(id, &payload, true)?;
        debug!(id = %id.short_id(), len = payload.len(), created = !existed, "updated record");
        Ok(id.clone())
    }

    /// Remove a record. An absent identifier is a `NotFound` error unless
    /// `ignore_missing` is set.
    pub fn delete(&self, id: &RecordId, ignore_missing: bool) -> DataStoreResult<()> {
        match self.destination.delete(id) {
            Ok(()) => {
                debug!(id = %id.short_id(), "deleted record");
                Ok(())
            }
            Err(DestinationError::NotFound(_)) if ignore_missing => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the records matching `filter`, windowed by `page`.
    ///
    /// Matches come back in the order the destination enumerates them,
    /// which is unspecified. Enumeration stops once the window is full. A
    /// stored payload that fails to decode fails the whole query.
    pub fn query(
        &self,
        filter: &QueryFilter,
        page: Pagination,
    ) -> DataStoreResult<Vec<(RecordId, Record)>> {
        let mut results = Vec::new();
        if page.limit() == Some(0) {
            return Ok(results);
        }
        let stop_after = page.stop_after();
        let mut matched = 0usize;
        for entry in self.destination.retrieve_all()? {
            let (id, payload) = entry?;
            let record = self.decode(&id, &payload)?;
            if !filter.matches(&record) {
                continue;
            }
            matched += 1;
            if matched > page.offset() {
                results.push((id, record));
            }
            if Some(matched) == stop_after {
                break;
            }
        }
        debug!(
            conditions = filter.len(),
            matched,
            returned = results.len(),
            "query complete"
        );
        Ok(results)
    }

    /// Number of records matching `filter`.
    pub fn count(&self, filter: &QueryFilter) -> DataStoreResult<usize> {
        let mut matched = 0;
        for entry in self.destination.retrieve_all()? {
            let (id, payload) = entry?;
            if filter.matches(&self.decode(&id, &payload)?) {
                matched += 1;
            }
        }
        Ok(matched)
    }

    fn decode(&self, id: &RecordId, payload: &[u8]) -> DataStoreResult<Record> {
        self.format.deserialize(payload).map_err(|e| {
            warn!(id = %id, error = %e, "stored payload failed to decode");
            e.into()
        })
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("format", &self.format.name())
            .field("destination", &self.destination.name())
            .finish()
    }
}
