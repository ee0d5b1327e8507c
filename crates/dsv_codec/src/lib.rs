#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::io::{Read, Write};

use dsv_schema::Record;

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod encoder;
mod error;
mod tokenizer;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::Error;

// -----------------------------------------------------------------------------
// Convenience entry points

/// Decodes a complete input string.
///
/// The first non-blank, non-comment line is taken as the header; use a
/// [`Decoder`] for headerless input or non-default settings.
///
/// # Examples
///
/// ```
/// use dsv_schema::Record;
///
/// #[derive(Record, Default)]
/// struct Pair {
///     #[record(name = "a")]
///     a: i64,
///     #[record(name = "b")]
///     b: i64,
/// }
///
/// let pairs: Vec<Pair> = dsv_codec::from_str("a,b\n1,2").unwrap();
/// assert_eq!(pairs[0].b, 2);
/// ```
pub fn from_str<T: Record + Default>(input: &str) -> Result<Vec<T>, Error> {
    Decoder::new(input.as_bytes()).decode()
}

/// Decodes a complete stream. See [`from_str`].
pub fn from_reader<T: Record + Default, R: Read>(reader: R) -> Result<Vec<T>, Error> {
    Decoder::new(reader).decode()
}

/// Encodes `records` to `writer`, header line first.
///
/// An empty slice writes nothing at all. Use an [`Encoder`] to change the
/// separator or suppress the header.
pub fn to_writer<T: Record, W: Write>(writer: W, records: &[T]) -> Result<(), Error> {
    Encoder::new(writer).encode(records)
}

/// Encodes `records` into a byte buffer. See [`to_writer`].
pub fn to_vec<T: Record>(records: &[T]) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    to_writer(&mut out, records)?;
    Ok(out)
}

/// Encodes `records` into a string. See [`to_writer`].
pub fn to_string<T: Record>(records: &[T]) -> Result<String, Error> {
    let out = to_vec(records)?;
    String::from_utf8(out)
        .map_err(|err| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

// -----------------------------------------------------------------------------
// Tests
