use core::any::TypeId;

use crate::info::FieldInfo;

// -----------------------------------------------------------------------------
// RecordInfo

/// The column schema of one record type.
///
/// Holds the type's mapped fields in declaration order, with flattened
/// records spliced in at their declaration position. Built once per type
/// (normally via [`#[derive(Record)]`](crate::derive::Record)), validated at
/// construction time and cached for the lifetime of the process by
/// [`registry::record_info`](crate::registry::record_info); a published
/// `&'static RecordInfo` is immutable and safe to read from any thread.
///
/// # Examples
///
/// ```
/// use dsv_schema::Record;
///
/// #[derive(Record, Default)]
/// struct Point {
///     #[record(name = "x")]
///     x: f64,
///     #[record(name = "y")]
///     y: f64,
/// }
///
/// let info = Point::record_info().unwrap();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.resolve("y").unwrap().path(), &[1]);
/// ```
#[derive(Debug)]
pub struct RecordInfo {
    ty_id: TypeId,
    type_path: &'static str,
    fields: Box<[FieldInfo]>,
}

impl RecordInfo {
    pub(crate) fn new(ty_id: TypeId, type_path: &'static str, fields: Vec<FieldInfo>) -> Self {
        Self {
            ty_id,
            type_path,
            fields: fields.into_boxed_slice(),
        }
    }

    /// Returns the `TypeId` of the described record type.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Returns the full path of the described record type.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Returns the mapped fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Returns the number of mapped fields.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Returns the column names of all non-catch-all fields, in declaration
    /// order. This is the header a stream derives when none is given.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| !f.flags().any())
            .map(FieldInfo::column)
    }

    /// Resolves a column name to a field.
    ///
    /// An exact name match wins; otherwise the catch-all field (if any) is
    /// returned; otherwise `None`.
    pub fn resolve(&self, column: &str) -> Option<&FieldInfo> {
        let mut catch_all = None;
        for field in self.fields.iter() {
            if field.flags().any() {
                catch_all = Some(field);
            }
            if field.column() == column {
                return Some(field);
            }
        }
        catch_all
    }
}

// -----------------------------------------------------------------------------
// Tests
