use std::fmt;

use sha2::{Digest, Sha256};

use super::error::StorageError;

/// Extension appended to every blob filename.
pub const BLOB_EXTENSION: &str = "dat";

/// Derive the storage location for a hex-encoded hash.
///
/// Two directory levels from the first four characters bound the fan-out:
/// `ab/cd/abcd....dat`. Hashes too short to split fall back to a flat name.
/// The result always uses `/` so it is identical on every platform.
pub fn shard_location(hash: &str) -> String {
    match (hash.get(..2), hash.get(2..4)) {
        (Some(first), Some(second)) => format!("{first}/{second}/{hash}.{BLOB_EXTENSION}"),
        _ => format!("{hash}.{BLOB_EXTENSION}"),
    }
}

/// A validated SHA-256 content hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute the SHA-256 hash of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(hash.into())
    }

    /// Construct from raw SHA-256 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a hex-encoded content hash string.
    pub fn from_hex(s: &str) -> Result<Self, StorageError> {
        if s.len() != 64 {
            return Err(StorageError::InvalidHash(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }

        let bytes =
            hex::decode(s).map_err(|e| StorageError::InvalidHash(format!("invalid hex: {e}")))?;

        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidHash("decoded to wrong length".into()))?;

        Ok(Self(arr))
    }

    /// Return the hash as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Relative storage location of the blob with this hash.
    pub fn location(&self) -> String {
        shard_location(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
