//! Foundation types for the record data store (RDS).
//!
//! Every other RDS crate depends on `rds-types`. Nothing here performs I/O;
//! these are the values that flow between the format and destination
//! capabilities and the orchestrator.
//!
//! # Key Types
//!
//! - [`Record`] -- field name to dynamically-typed value mapping
//! - [`RecordId`] -- opaque identifier, derived from a payload's BLAKE3 hash on insert
//! - [`QueryFilter`] -- equality-subset filter evaluated against decoded records

pub mod error;
pub mod filter;
pub mod id;
pub mod record;

pub use error::{TypeError, TypeResult};
pub use filter::{values_equal, QueryFilter};
pub use id::RecordId;
pub use record::{into_record, ConfigMap, Record, Value};
