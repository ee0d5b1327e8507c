use core::{error, fmt};

// -----------------------------------------------------------------------------
// SchemaError

/// An error raised while building a record type's column schema.
///
/// Schema errors are detected once, when a type is first described, and then
/// cached by the [`registry`](crate::registry) as a permanent failure for
/// that type: repeated use keeps returning the same error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two fields of the same type map to the same column name.
    ColumnConflict {
        type_path: &'static str,
        column: &'static str,
    },
    /// More than one field of the same type is marked `any`.
    MultipleCatchAll {
        type_path: &'static str,
        first: &'static str,
        second: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnConflict { type_path, column } => {
                write!(
                    f,
                    "two fields of `{type_path}` map to the same column `{column}`"
                )
            }
            Self::MultipleCatchAll {
                type_path,
                first,
                second,
            } => {
                write!(
                    f,
                    "`{type_path}` marks both `{first}` and `{second}` as `any`; \
                     a type may have at most one catch-all field"
                )
            }
        }
    }
}

impl error::Error for SchemaError {}
