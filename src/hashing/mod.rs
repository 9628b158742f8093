//! BLAKE3 content fingerprints and token hashing.

use std::fmt;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// 32-byte BLAKE3 digest of a raw request input (image payload or text).
///
/// Rendered as lowercase hex, which is also the key format of the golden
/// response table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(#[serde(with = "hex_digest")] [u8; 32]);

impl Fingerprint {
    /// Wraps a raw digest.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses a 64-character hex digest (case-insensitive).
    pub fn from_hex(hex: &str) -> Option<Self> {
        blake3::Hash::from_hex(hex.trim())
            .ok()
            .map(|h| Self(*h.as_bytes()))
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(blake3::Hash::from_bytes(*bytes).to_hex().as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        blake3::Hash::from_hex(s.trim())
            .map(|h| *h.as_bytes())
            .map_err(D::Error::custom)
    }
}

/// Fingerprints raw input bytes.
#[inline]
pub fn fingerprint_input(input: &[u8]) -> Fingerprint {
    Fingerprint(*blake3::hash(input).as_bytes())
}

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// Good enough for indexing and feature hashing; use [`fingerprint_input`] when the
/// full digest matters.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Maps a lexical token to a sparse-vector dimension.
#[inline]
pub fn hash_token(token: &str) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(b"token|");
    hasher.update(token.as_bytes());
    let hash = hasher.finalize();
    let bytes: [u8; 4] = hash.as_bytes()[0..4]
        .try_into()
        .expect("BLAKE3 always produces at least 4 bytes");
    u32::from_le_bytes(bytes)
}
