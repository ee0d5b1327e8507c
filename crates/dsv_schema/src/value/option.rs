use crate::value::{Cell, ConvertError};

// -----------------------------------------------------------------------------
// Option<T>

/// Optional fields stay `None` for empty tokens and allocate a fresh
/// default slot on the first decoded value, so a decoded `None` and a
/// never-seen column are indistinguishable — both encode back to an empty
/// token.
impl<T: Cell + Default> Cell for Option<T> {
    fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
        if text.is_empty() {
            return Ok(());
        }
        self.get_or_insert_with(T::default).decode_cell(text)
    }

    fn encode_cell(&self) -> Result<String, ConvertError> {
        match self {
            Some(value) => value.encode_cell(),
            None => Ok(String::new()),
        }
    }

    fn insert_entry(&mut self, column: &str, value: &str) -> Option<Result<(), ConvertError>> {
        match self {
            Some(inner) => inner.insert_entry(column, value),
            // Probe a fresh slot first; only keep it if the inner type
            // really is an associative container.
            None => {
                let mut fresh = T::default();
                let result = fresh.insert_entry(column, value)?;
                *self = Some(fresh);
                Some(result)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
