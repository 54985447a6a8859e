//! Serialization formats for the record data store.
//!
//! A [`Format`] turns a [`Record`](rds_types::Record) into an opaque payload
//! and back. Implementations are stateless apart from their configuration
//! and must satisfy the round-trip law: decoding an encoded record yields the
//! same record.
//!
//! # Formats
//!
//! - [`JsonFormat`] (`"json"`) -- compact or pretty-printed JSON
//! - [`TomlFormat`] (`"toml"`) -- TOML document; cannot represent `null`
//!
//! Formats are resolved by name through the static [`FORMATS`] table.

pub mod error;
pub mod json;
pub mod registry;
pub mod toml_format;
pub mod traits;

pub use error::{FormatError, FormatResult};
pub use json::JsonFormat;
pub use registry::{format_names, lookup_format, FormatEntry, FORMATS};
pub use toml_format::TomlFormat;
pub use traits::Format;
