use core::any::type_name;
use core::hash::BuildHasher;
use std::collections::{BTreeMap, HashMap};

use crate::value::{Cell, ConvertError};

// -----------------------------------------------------------------------------
// Entry conversion

// Decodes `value` into a fresh `V`, or `None` for an empty value (which is
// skipped without creating an entry).
fn converted<V: Cell + Default>(value: &str) -> Result<Option<V>, ConvertError> {
    if value.is_empty() {
        return Ok(None);
    }
    let mut slot = V::default();
    slot.decode_cell(value)?;
    Ok(Some(slot))
}

// -----------------------------------------------------------------------------
// Map impls

// Maps have no single-token form: they fill per entry via `insert_entry`,
// which makes them usable both as `any` catch-all fields and as ordinary
// fields matched by their own column name.
macro_rules! impl_map_cell {
    ($(($($generics:tt)*) => $ty:ty,)*) => {$(
        impl<$($generics)*> Cell for $ty {
            fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
                if text.is_empty() {
                    return Ok(());
                }
                Err(ConvertError::Unsupported {
                    type_path: type_name::<Self>(),
                })
            }

            fn encode_cell(&self) -> Result<String, ConvertError> {
                Err(ConvertError::Unsupported {
                    type_path: type_name::<Self>(),
                })
            }

            fn insert_entry(
                &mut self,
                column: &str,
                value: &str,
            ) -> Option<Result<(), ConvertError>> {
                Some(converted(value).map(|slot| {
                    if let Some(slot) = slot {
                        self.insert(column.to_owned(), slot);
                    }
                }))
            }
        }
    )*};
}

impl_map_cell! {
    (V: Cell + Default, S: BuildHasher) => HashMap<String, V, S>,
    (V: Cell + Default, S: BuildHasher) => hashbrown::HashMap<String, V, S>,
    (V: Cell + Default) => BTreeMap<String, V>,
}

// -----------------------------------------------------------------------------
// Tests
