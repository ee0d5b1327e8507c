#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// We use `crate` paths inside the crate itself, but the derive macro and doc
// tests emit `dsv_schema` paths. `extern self` lets both resolve here.
extern crate self as dsv_schema;

// -----------------------------------------------------------------------------
// Modules

mod record;

pub mod info;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use record::{ColumnMap, Record};
pub use value::{Cell, ConvertError};

pub use info::{FieldFlags, FieldInfo, RecordInfo, SchemaError};

pub use dsv_schema_derive as derive;
pub use dsv_schema_derive::Record;
