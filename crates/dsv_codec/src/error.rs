use core::{error, fmt};

use dsv_schema::{ConvertError, SchemaError};

// -----------------------------------------------------------------------------
// Error

/// An error raised while decoding or encoding a record stream.
///
/// Decode-side variants carry the physical line number (counting every line
/// of input, skipped ones included) and, where one applies, the 1-based
/// field position within the record.
#[derive(Debug)]
pub enum Error {
    /// The underlying stream failed.
    Io(std::io::Error),
    /// The record type's column schema could not be built.
    Schema(SchemaError),
    /// A header was required but came out empty.
    EmptyHeader,
    /// A record's field count does not match the header.
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A header column matches no record field and skipping is disabled.
    UnknownColumn {
        line: usize,
        field: usize,
        column: String,
    },
    /// A field value could not be decoded. A `field` of 0 marks a failure
    /// of the record as a whole (a custom row hook).
    Decode {
        line: usize,
        field: usize,
        column: String,
        source: ConvertError,
    },
    /// A field value could not be encoded. The `column` is empty for a
    /// failure of the record as a whole.
    Encode {
        column: String,
        source: ConvertError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(source) => write!(f, "stream failure: {source}"),
            Self::Schema(source) => fmt::Display::fmt(source, f),
            Self::EmptyHeader => f.write_str("empty header"),
            Self::FieldCount {
                line,
                expected,
                found,
            } => {
                write!(
                    f,
                    "line {line}: number of fields does not match header \
                     (got {found}, expected {expected})"
                )
            }
            Self::UnknownColumn {
                line,
                field,
                column,
            } => {
                write!(
                    f,
                    "line {line} field {field} ({column}): no matching record field"
                )
            }
            Self::Decode {
                line,
                field,
                column,
                source,
            } => {
                if *field == 0 {
                    write!(f, "line {line}: {source}")
                } else {
                    write!(f, "line {line} field {field} ({column}): {source}")
                }
            }
            Self::Encode { column, source } => {
                if column.is_empty() {
                    fmt::Display::fmt(source, f)
                } else {
                    write!(f, "field `{column}`: {source}")
                }
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            Self::Schema(source) => Some(source),
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(source: std::io::Error) -> Self {
        Self::Io(source)
    }
}

impl From<SchemaError> for Error {
    #[inline]
    fn from(source: SchemaError) -> Self {
        Self::Schema(source)
    }
}
