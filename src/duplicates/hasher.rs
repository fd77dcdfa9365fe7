//! BLAKE3 content hasher for text blobs.
//!
//! # Overview
//!
//! Every identity decision in the engine goes through [`ContentHash`]: whole
//! documents are hashed over their minified text and paragraph blocks over
//! their normalized text. Two blobs are duplicates exactly when their
//! fingerprints are equal.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 32-byte BLAKE3 digest identifying a piece of normalized text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash an arbitrary text blob.
    ///
    /// # Example
    ///
    /// ```
    /// use textdupe::duplicates::ContentHash;
    ///
    /// assert_eq!(ContentHash::of("abc"), ContentHash::of("abc"));
    /// assert_ne!(ContentHash::of("abc"), ContentHash::of("abd"));
    /// ```
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self(*blake3::hash(text.as_bytes()).as_bytes())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal representation (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hash_to_hex(&self.0)
    }

    /// Parse a hash from its hexadecimal representation.
    ///
    /// Returns `None` if the string is not exactly 64 hex digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_hash(hex).map(Self)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid content hash: {raw}")))
    }
}

/// Convert digest bytes to a lowercase hex string.
#[must_use]
pub fn hash_to_hex(bytes: &[u8; 32]) -> String {
    use fmt::Write;

    let mut out = String::with_capacity(64);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Parse a 64-character hex string back into digest bytes.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<[u8; 32]> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut out = [0u8; 32];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(out)
}
