use std::fmt;
use std::str::FromStr;

use hex::FromHex;

use crate::error::Error;
use crate::OUT_LEN;

/// A default-length (32-byte) digest.
///
/// Equality is constant time, so a `Hash` produced by a keyed hasher can be
/// compared directly against a received MAC.
#[derive(Clone, Copy, Hash)]
pub struct Hash([u8; OUT_LEN]);

impl Hash {
    pub const fn from_bytes(bytes: [u8; OUT_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; OUT_LEN] {
        &self.0
    }

    pub const fn into_bytes(self) -> [u8; OUT_LEN] {
        self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses 64 hex characters, in either case.
    pub fn from_hex(hex: impl AsRef<[u8]>) -> Result<Self, Error> {
        Ok(Self(<[u8; OUT_LEN]>::from_hex(hex)?))
    }
}

impl From<[u8; OUT_LEN]> for Hash {
    fn from(bytes: [u8; OUT_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Hash> for [u8; OUT_LEN] {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Hash {
    fn eq(&self, other: &Hash) -> bool {
        constant_time_eq::constant_time_eq_32(&self.0, &other.0)
    }
}

impl PartialEq<[u8; OUT_LEN]> for Hash {
    fn eq(&self, other: &[u8; OUT_LEN]) -> bool {
        constant_time_eq::constant_time_eq_32(&self.0, other)
    }
}

impl PartialEq<[u8]> for Hash {
    fn eq(&self, other: &[u8]) -> bool {
        constant_time_eq::constant_time_eq(&self.0, other)
    }
}

impl Eq for Hash {}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_hex(s)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex::FromHexError;

    const EMPTY: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

    #[test]
    fn hex_roundtrip_is_lowercase() {
        let hash: Hash = EMPTY.to_uppercase().parse().expect("valid hex");
        assert_eq!(hash.to_hex(), EMPTY);
        assert_eq!(format!("{hash}"), EMPTY);
        assert_eq!(format!("{hash:?}"), format!("Hash({EMPTY})"));
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert_eq!(
            Hash::from_hex(&EMPTY[..62]),
            Err(Error::Hex(FromHexError::InvalidStringLength))
        );
        let mut bad = EMPTY.to_string();
        bad.replace_range(0..1, "g");
        assert_eq!(
            Hash::from_hex(&bad),
            Err(Error::Hex(FromHexError::InvalidHexCharacter { c: 'g', index: 0 }))
        );
    }

    #[test]
    fn compares_with_raw_bytes() {
        let bytes = [7u8; OUT_LEN];
        let hash = Hash::from(bytes);
        assert_eq!(hash, bytes);
        assert!(hash == bytes[..]);
        assert!(hash != [7u8; 31][..]);
        assert_eq!(<[u8; OUT_LEN]>::from(hash), bytes);
    }
}
