use core::num::{ParseFloatError, ParseIntError};
use core::{error, fmt};
use std::borrow::Cow;

// -----------------------------------------------------------------------------
// ConvertError

/// An error converting one value to or from its textual token.
#[derive(Clone, Debug)]
pub enum ConvertError {
    /// The token is not a valid decimal integer for the target type.
    Int {
        text: String,
        source: ParseIntError,
    },
    /// The token is not a valid floating point number.
    Float {
        text: String,
        source: ParseFloatError,
    },
    /// The token is not one of the accepted boolean spellings.
    Bool { text: String },
    /// The type has no textual form in this direction.
    Unsupported { type_path: &'static str },
    /// A failure reported by a custom conversion.
    Custom { message: Cow<'static, str> },
}

impl ConvertError {
    /// Creates a [`ConvertError::Custom`] carrying `message`.
    ///
    /// Intended for [`Cell`](crate::Cell) implementations and
    /// [`Record`](crate::Record) row hooks outside this crate.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int { text, source } => write!(f, "invalid integer `{text}`: {source}"),
            Self::Float { text, source } => write!(f, "invalid float `{text}`: {source}"),
            Self::Bool { text } => write!(f, "invalid boolean `{text}`"),
            Self::Unsupported { type_path } => {
                write!(f, "no textual form for type `{type_path}`")
            }
            Self::Custom { message } => f.write_str(message),
        }
    }
}

impl error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Int { source, .. } => Some(source),
            Self::Float { source, .. } => Some(source),
            _ => None,
        }
    }
}
