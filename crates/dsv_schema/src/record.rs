use core::hash::BuildHasher;
use std::collections::{BTreeMap, HashMap};

use crate::info::{RecordInfo, RecordInfoBuilder, SchemaError};
use crate::value::{Cell, ConvertError};

// -----------------------------------------------------------------------------
// Record

/// A struct that maps to one line of a delimited stream.
///
/// Implemented by [`#[derive(Record)]`](crate::derive::Record), which builds
/// the type's [`RecordInfo`] from `#[record(...)]` annotations and generates
/// path-indexed access to each field as a [`Cell`].
///
/// # Derive annotations
///
/// ```
/// use dsv_schema::Record;
///
/// #[derive(Record, Default)]
/// struct Reading {
///     // Maps to the column `sensor`; an unannotated field maps to a
///     // column named after the field itself.
///     #[record(name = "sensor")]
///     sensor: String,
///     // Excluded from the schema entirely.
///     #[record(skip)]
///     cached_display: String,
///     // Nested record spliced in at this position.
///     #[record(flatten)]
///     position: Position,
///     // Receives every column not matched by name.
///     #[record(any)]
///     extra: std::collections::HashMap<String, String>,
/// }
///
/// #[derive(Record, Default)]
/// struct Position {
///     #[record(name = "lat")]
///     lat: f64,
///     #[record(name = "lon")]
///     lon: f64,
/// }
///
/// let info = Reading::record_info().unwrap();
/// assert_eq!(info.columns().collect::<Vec<_>>(), ["sensor", "lat", "lon"]);
/// ```
///
/// # Row hooks
///
/// The default methods are capability hooks checked by the codec before the
/// generic field mapping, in this order: [`from_row`]/[`to_row`] take over
/// an entire record, [`as_column_map`] marks the value itself as the
/// header-keyed container. A `None` return (the default) selects the generic
/// path.
///
/// [`from_row`]: Record::from_row
/// [`to_row`]: Record::to_row
/// [`as_column_map`]: Record::as_column_map
pub trait Record: 'static {
    /// Builds the column schema of this type.
    ///
    /// Generated code; use [`record_info`](Record::record_info) instead,
    /// which caches the result process-wide.
    fn build_record_info() -> Result<RecordInfo, SchemaError>
    where
        Self: Sized;

    /// Returns the cached column schema of this type.
    fn record_info() -> Result<&'static RecordInfo, SchemaError>
    where
        Self: Sized,
    {
        crate::registry::record_info::<Self>()
    }

    /// Returns the field at `path` for reading, or `None` when the path
    /// crosses an unallocated optional record.
    fn cell(&self, path: &[usize]) -> Option<&dyn Cell>;

    /// Returns the field at `path` for writing, allocating empty optional
    /// records along the way so the returned handle is always writable.
    fn cell_mut(&mut self, path: &[usize]) -> Option<&mut dyn Cell>;

    /// Decodes a whole row, taking precedence over the generic field
    /// mapping. `header` and `row` are guaranteed to be of equal length;
    /// `row` holds the raw tokens, before trimming and unescaping.
    fn from_row(&mut self, header: &[String], row: &[String]) -> Option<Result<(), ConvertError>> {
        let _ = (header, row);
        None
    }

    /// Encodes a whole row, taking precedence over the generic field
    /// mapping. The returned tokens are written verbatim.
    fn to_row(&self, header: &[String]) -> Option<Result<Vec<String>, ConvertError>> {
        let _ = header;
        None
    }

    /// Marks the value itself as the header-keyed container: every column
    /// is inserted verbatim, including empty ones.
    fn as_column_map(&mut self) -> Option<&mut dyn ColumnMap> {
        None
    }
}

// -----------------------------------------------------------------------------
// ColumnMap

/// A target that captures raw columns verbatim, keyed by header name.
pub trait ColumnMap {
    /// Stores the raw `value` under `column`.
    fn insert_column(&mut self, column: &str, value: &str);
}

impl<S: BuildHasher> ColumnMap for HashMap<String, String, S> {
    fn insert_column(&mut self, column: &str, value: &str) {
        self.insert(column.to_owned(), value.to_owned());
    }
}

impl<S: BuildHasher> ColumnMap for hashbrown::HashMap<String, String, S> {
    fn insert_column(&mut self, column: &str, value: &str) {
        self.insert(column.to_owned(), value.to_owned());
    }
}

impl ColumnMap for BTreeMap<String, String> {
    fn insert_column(&mut self, column: &str, value: &str) {
        self.insert(column.to_owned(), value.to_owned());
    }
}

// -----------------------------------------------------------------------------
// Map targets

// String-to-string maps decode as whole records: an empty schema plus the
// `as_column_map` capability.
macro_rules! impl_map_record {
    ($($ty:ty),* $(,)?) => {$(
        impl Record for $ty {
            fn build_record_info() -> Result<RecordInfo, SchemaError> {
                Ok(RecordInfoBuilder::new::<Self>().finish())
            }

            fn cell(&self, _path: &[usize]) -> Option<&dyn Cell> {
                None
            }

            fn cell_mut(&mut self, _path: &[usize]) -> Option<&mut dyn Cell> {
                None
            }

            fn as_column_map(&mut self) -> Option<&mut dyn ColumnMap> {
                Some(self)
            }
        }
    )*};
}

impl_map_record!(
    HashMap<String, String>,
    BTreeMap<String, String>,
    hashbrown::HashMap<String, String>,
);

// -----------------------------------------------------------------------------
// Positional rows

/// A plain sequence of cells encodes positionally when its length matches
/// the header; with any other length the generic mapping applies (and, with
/// no named fields to match, yields an empty row).
impl<T: Cell + 'static> Record for Vec<T> {
    fn build_record_info() -> Result<RecordInfo, SchemaError> {
        Ok(RecordInfoBuilder::new::<Self>().finish())
    }

    fn cell(&self, _path: &[usize]) -> Option<&dyn Cell> {
        None
    }

    fn cell_mut(&mut self, _path: &[usize]) -> Option<&mut dyn Cell> {
        None
    }

    fn to_row(&self, header: &[String]) -> Option<Result<Vec<String>, ConvertError>> {
        if self.len() != header.len() {
            return None;
        }
        let mut row = Vec::with_capacity(self.len());
        for cell in self {
            match cell.encode_cell() {
                Ok(text) => row.push(text),
                Err(err) => return Some(Err(err)),
            }
        }
        Some(Ok(row))
    }
}

// -----------------------------------------------------------------------------
// Tests
