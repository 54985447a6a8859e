//! Storage destinations for the record data store.
//!
//! A destination is a key-value store of opaque payloads keyed by
//! [`RecordId`](rds_types::RecordId). It never interprets payloads; the
//! format capability owns their meaning.
//!
//! # Backends
//!
//! All backends implement the [`Destination`] trait:
//!
//! - [`LocalDrive`] (`"localdrive"`) -- one file per record in a directory
//! - [`InMemoryDestination`] (`"memory"`) -- `HashMap`-based store for tests and embedding
//!
//! # Rules
//!
//! 1. `store` without `overwrite` never replaces an existing payload.
//! 2. `retrieve` and `delete` of an absent identifier fail with `NotFound`.
//! 3. `retrieve_all` order is backend-defined and carries no meaning.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod local;
pub mod memory;
pub mod registry;
pub mod traits;

pub use error::{DestinationError, DestinationResult};
pub use local::LocalDrive;
pub use memory::InMemoryDestination;
pub use registry::{destination_names, lookup_destination, DestinationEntry, DESTINATIONS};
pub use traits::{Destination, PayloadIter};
