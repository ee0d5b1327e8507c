use core::any::type_name;

use crate::value::{Cell, ConvertError};

// -----------------------------------------------------------------------------
// Vec<u8>

impl Cell for Vec<u8> {
    /// A token of valid hexadecimal text decodes to the bytes it spells;
    /// anything else is taken as the raw bytes of the token.
    fn decode_cell(&mut self, text: &str) -> Result<(), ConvertError> {
        if text.is_empty() {
            return Ok(());
        }
        *self = match hex::decode(text) {
            Ok(bytes) => bytes,
            Err(_) => text.as_bytes().to_vec(),
        };
        Ok(())
    }

    /// Bytes pass through unmodified; choosing a textual representation
    /// such as hex is the caller's concern. Sequences that are not valid
    /// UTF-8 are lossily converted.
    fn encode_cell(&self) -> Result<String, ConvertError> {
        Ok(String::from_utf8_lossy(self).into_owned())
    }
}

// -----------------------------------------------------------------------------
// [u8; N]

impl<const N: usize> Cell for [u8; N] {
    fn decode_cell(&mut self, _text: &str) -> Result<(), ConvertError> {
        Err(ConvertError::Unsupported {
            type_path: type_name::<Self>(),
        })
    }

    fn encode_cell(&self) -> Result<String, ConvertError> {
        Ok(String::from_utf8_lossy(self).into_owned())
    }
}

// -----------------------------------------------------------------------------
// Tests
