//! Errors reported by value access and conversion.

use crate::value::JsonType;

/// Alias for a `Result` with the error type `dynjson::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors that can occur when accessing or
/// converting a [`Value`][crate::Value].
///
/// Every error is reported synchronously to the immediate caller; no operation
/// retries internally and no operation leaves a value in a partially-destroyed
/// state.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An accessor expected one JSON type but the value holds another.
    #[error("type mismatch: expected {expected}, found {found:?}")]
    TypeMismatch {
        expected: &'static str,
        found: JsonType,
    },

    /// Indexed access beyond the current container size.
    #[error("index {index} out of range (len: {len})")]
    OutOfRange { index: usize, len: usize },

    /// Keyed access for a member that is not present.
    #[error("key {key:?} not found")]
    KeyNotFound { key: String },

    /// A numeric coercion failed, either because a string payload is not a
    /// valid JSON number literal or because the value does not fit the target.
    #[error("invalid number: {got}")]
    InvalidNumber { got: String },

    /// An event stream handed to [`ValueBuilder`][crate::ValueBuilder] was not
    /// well formed.
    #[error("unexpected {event} event")]
    UnexpectedEvent { event: &'static str },

    /// A failure reported by a `Serialize`/`Deserialize` implementation while
    /// converting through serde.
    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl Error {
    pub(crate) fn type_mismatch(expected: &'static str, found: JsonType) -> Self {
        Error::TypeMismatch { expected, found }
    }

    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        Error::OutOfRange { index, len }
    }

    pub(crate) fn key_not_found(key: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_number(got: &str) -> Self {
        Error::InvalidNumber {
            got: got.to_string(),
        }
    }
}
