use std::fmt;
use std::str::FromStr;

use crate::error::HashError;
use crate::hex;

/// Length in bytes of a raw SHA-1 digest.
pub const RAW_LEN: usize = 20;
/// Length in characters of a hex-encoded SHA-1.
pub const HEX_LEN: usize = 40;

/// A git object identifier: the SHA-1 of an object's canonical serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; RAW_LEN]);

impl ObjectId {
    /// Wrap a raw 20-byte digest.
    pub fn from_raw(bytes: [u8; RAW_LEN]) -> Self {
        ObjectId(bytes)
    }

    /// Parse a 40-character lowercase (or uppercase) hex string.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != HEX_LEN {
            return Err(HashError::InvalidLength(hex.len()));
        }
        Ok(ObjectId(hex::decode(hex)?))
    }

    /// Parse a hex prefix, right-padding is not performed; returns the raw prefix bytes
    /// along with how many nibbles were consumed for callers doing prefix comparison.
    pub fn is_valid_hex_prefix(prefix: &str) -> bool {
        !prefix.is_empty()
            && prefix.len() <= HEX_LEN
            && prefix.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// The raw 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// First 7 characters of the hex representation (git's conventional short id).
    pub fn short_hex(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// True if this id's hex form starts with `prefix` (case-insensitive on `prefix`).
    pub fn hex_starts_with(&self, prefix: &str) -> bool {
        let full = self.to_hex();
        full.starts_with(&prefix.to_ascii_lowercase())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::from_hex(s)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
