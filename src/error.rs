use std::fmt;

use hex::FromHexError;

use crate::KEY_LEN;

/// Errors surfaced by this crate.
///
/// Hashing itself cannot fail; only constructing a keyed hasher from an
/// arbitrary slice and parsing a digest from hex can.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A keyed hasher was requested with a key that is not [`KEY_LEN`] bytes.
    InvalidKeyLength { len: usize },
    /// A digest string was not valid hex of the right length.
    Hex(FromHexError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKeyLength { len } => {
                write!(f, "invalid key length {len}, expected {KEY_LEN} bytes")
            }
            Self::Hex(err) => write!(f, "invalid hex digest: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidKeyLength { .. } => None,
            Self::Hex(err) => Some(err),
        }
    }
}

impl From<FromHexError> for Error {
    fn from(value: FromHexError) -> Self {
        Error::Hex(value)
    }
}
