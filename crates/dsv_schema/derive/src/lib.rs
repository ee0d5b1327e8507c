//! Derive support for `dsv_schema`. See [`Record`].
#![cfg_attr(docsrs, feature(doc_cfg))]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod expand;
mod field;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements `dsv_schema::Record` for a struct with
/// named fields: it builds the type's column schema in field declaration
/// order and generates path-indexed access to every mapped field.
///
/// ## Field Attributes
///
/// All field attributes live under `#[record(...)]`:
///
/// ```rust, ignore
/// #[derive(Record, Default)]
/// struct Sample {
///     // The column this field maps to. Without `name`, the field's own
///     // identifier is the column name.
///     #[record(name = "s")]
///     text: String,
///
///     // Excluded from the schema. `name = "-"` means the same thing.
///     #[record(skip)]
///     internal: u64,
///
///     // The fields of `Meta` are spliced in at this position, with their
///     // own names. Also allowed through one level of `Option`; the
///     // wrapped type then needs `Default` so empty slots can be
///     // allocated on first write.
///     #[record(flatten)]
///     meta: Meta,
///
///     // Catch-all: receives every column not matched by any other field.
///     // At most one per type (flattened fields included) — a second one
///     // is a schema construction error.
///     #[record(any)]
///     rest: HashMap<String, String>,
/// }
/// ```
///
/// ## Type Attributes
///
/// `#[record(auto_register)]` submits the type to the schema registry's
/// startup collection, so `registry::preload` can build and validate its
/// schema eagerly. A no-op unless the `auto_register` feature is enabled.
///
/// ## Limitations
///
/// Tuple structs, unit structs, enums and generic types are not supported.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
