use core::any::{TypeId, type_name};

use crate::Record;
use crate::info::{FieldFlags, FieldInfo, RecordInfo, SchemaError};

// -----------------------------------------------------------------------------
// RecordInfoBuilder

/// Assembles and validates a [`RecordInfo`].
///
/// `#[derive(Record)]` drives this builder from generated code; it is public
/// so hand-written [`Record`](crate::Record) implementations can produce
/// schemas the same way. Fields must be added in declaration order — the
/// resulting schema's order is the insertion order, and a flattened record's
/// fields keep their own order at the splice point.
pub struct RecordInfoBuilder {
    ty_id: TypeId,
    type_path: &'static str,
    fields: Vec<FieldInfo>,
}

impl RecordInfoBuilder {
    /// Creates a builder for record type `T`.
    pub fn new<T: 'static>() -> Self {
        Self {
            ty_id: TypeId::of::<T>(),
            type_path: type_name::<T>(),
            fields: Vec::new(),
        }
    }

    /// Adds the field at `index` mapped to `column`.
    pub fn column(
        &mut self,
        index: usize,
        column: &'static str,
        flags: FieldFlags,
    ) -> Result<(), SchemaError> {
        self.add(FieldInfo::new(index, column, flags))
    }

    /// Splices the fields of the record type `T` embedded at `index`,
    /// prefixing their paths with `index` and keeping their internal order.
    pub fn flatten<T: Record>(&mut self, index: usize) -> Result<(), SchemaError> {
        let inner = crate::registry::record_info::<T>()?;
        for field in inner.fields() {
            self.add(field.prefixed(index))?;
        }
        Ok(())
    }

    /// Finishes the schema.
    pub fn finish(self) -> RecordInfo {
        RecordInfo::new(self.ty_id, self.type_path, self.fields)
    }

    fn add(&mut self, field: FieldInfo) -> Result<(), SchemaError> {
        for existing in &self.fields {
            if existing.column() == field.column() {
                return Err(SchemaError::ColumnConflict {
                    type_path: self.type_path,
                    column: field.column(),
                });
            }
            if existing.flags().any() && field.flags().any() {
                return Err(SchemaError::MultipleCatchAll {
                    type_path: self.type_path,
                    first: existing.column(),
                    second: field.column(),
                });
            }
        }
        self.fields.push(field);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::RecordInfoBuilder;
    use crate::info::{FieldFlags, SchemaError};

    struct Marker;

    #[test]
    fn rejects_duplicate_columns() {
        let mut builder = RecordInfoBuilder::new::<Marker>();
        builder.column(0, "a", FieldFlags::ELEMENT).unwrap();
        let err = builder.column(1, "a", FieldFlags::ELEMENT).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnConflict { column: "a", .. }));
    }

    #[test]
    fn rejects_second_catch_all() {
        let any = FieldFlags::ELEMENT | FieldFlags::ANY;
        let mut builder = RecordInfoBuilder::new::<Marker>();
        builder.column(0, "rest", any).unwrap();
        let err = builder.column(1, "more", any).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MultipleCatchAll {
                first: "rest",
                second: "more",
                ..
            }
        ));
    }

    #[test]
    fn keeps_insertion_order() {
        let mut builder = RecordInfoBuilder::new::<Marker>();
        builder.column(3, "c", FieldFlags::ELEMENT).unwrap();
        builder.column(0, "a", FieldFlags::ELEMENT).unwrap();
        let info = builder.finish();
        let order: Vec<_> = info.fields().iter().map(|f| f.column()).collect();
        assert_eq!(order, ["c", "a"]);
    }
}
