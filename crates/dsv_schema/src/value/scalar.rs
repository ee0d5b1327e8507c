use crate::value::{Cell, ConvertError};

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_int_cell {
    ($($ty:ty),* $(,)?) => {$(
        impl Cell for $ty {
            fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
                if text.is_empty() {
                    return Ok(());
                }
                *self = text.parse::<$ty>().map_err(|source| ConvertError::Int {
                    text: text.to_owned(),
                    source,
                })?;
                Ok(())
            }

            fn encode_cell(&self) -> Result<String, ConvertError> {
                Ok(self.to_string())
            }
        }
    )*};
}

impl_int_cell!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float_cell {
    ($($ty:ty),* $(,)?) => {$(
        impl Cell for $ty {
            fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
                if text.is_empty() {
                    return Ok(());
                }
                *self = text.parse::<$ty>().map_err(|source| ConvertError::Float {
                    text: text.to_owned(),
                    source,
                })?;
                Ok(())
            }

            // `Display` already prints the shortest round-trippable form.
            fn encode_cell(&self) -> Result<String, ConvertError> {
                Ok(self.to_string())
            }
        }
    )*};
}

impl_float_cell!(f32, f64);

// -----------------------------------------------------------------------------
// Bool

impl Cell for bool {
    /// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and the matching false
    /// spellings, with surrounding whitespace ignored.
    fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
        if text.is_empty() {
            return Ok(());
        }
        *self = match text.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
            "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
            _ => {
                return Err(ConvertError::Bool {
                    text: text.to_owned(),
                });
            }
        };
        Ok(())
    }

    fn encode_cell(&self) -> Result<String, ConvertError> {
        Ok(self.to_string())
    }
}

// -----------------------------------------------------------------------------
// String

impl Cell for String {
    /// Assigns the token verbatim; whitespace trimming is the caller's
    /// concern. An empty token keeps the current value.
    fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
        if text.is_empty() {
            return Ok(());
        }
        self.clear();
        self.push_str(text);
        Ok(())
    }

    fn encode_cell(&self) -> Result<String, ConvertError> {
        Ok(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Tests
