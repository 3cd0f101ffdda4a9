use std::convert::Infallible;

use thiserror::Error;

/// Errors returned by table construction and key conversion.
///
/// A full table or a missing key is not an error: `insert` reports the former
/// as `false`, and `search`/`delete` report the latter as `None`/`false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The table was configured with zero slots.
    #[error("table size must be positive, got {size}")]
    InvalidSize { size: usize },
    /// The value cannot be used as a key. Only text and whole numbers are supported.
    #[error("unsupported key type: expected text or a whole number, found {found}")]
    TypeMismatch { found: &'static str },
}

// Lets a single `TryInto<Key>` bound cover infallible conversions as well.
impl From<Infallible> for Error {
    fn from(never: Infallible) -> Error {
        match never {}
    }
}
