//! Record data store: CRUD and equality queries over records, with the
//! serialization format and the storage destination chosen by name at
//! construction time.
//!
//! This is the main entry point for applications embedding RDS.

pub mod config;
pub mod error;
pub mod query;
pub mod store;

pub use config::{generate_configuration, supported, DataStoreConfig, Supported};
pub use error::{DataStoreError, DataStoreResult};
pub use query::Pagination;
pub use store::DataStore;

// Re-export key types
pub use rds_dest::{Destination, DestinationError, InMemoryDestination, LocalDrive};
pub use rds_format::{Format, FormatError, JsonFormat, TomlFormat};
pub use rds_types::{into_record, ConfigMap, QueryFilter, Record, RecordId, Value};
