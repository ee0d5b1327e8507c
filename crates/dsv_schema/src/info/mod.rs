//! Per-type column schemas.
//!
//! ## Menu
//!
//! - [`RecordInfo`]: the cached, ordered column schema of one record type.
//! - [`FieldInfo`]: one field of a schema — structural path, column name, flags.
//! - [`FieldFlags`]: mapping-participation flags for a field.
//! - [`RecordInfoBuilder`]: construction-time assembly and validation.
//! - [`SchemaError`]: annotation and construction failures.
//!
//! Schemas are normally produced by [`#[derive(Record)]`](crate::derive::Record)
//! and fetched through [`registry::record_info`](crate::registry::record_info);
//! the builder is public for hand-written [`Record`](crate::Record)
//! implementations.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod error;
mod field_info;
mod record_info;

// -----------------------------------------------------------------------------
// Exports

pub use builder::RecordInfoBuilder;
pub use error::SchemaError;
pub use field_info::{FieldFlags, FieldInfo};
pub use record_info::RecordInfo;
