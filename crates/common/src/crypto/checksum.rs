//! MD5 transfer checksum
//!
//! One digest, two wire encodings: uploads declare it as standard base64
//! (body field and `Content-MD5` header), downloads compare it as lowercase
//! hex against the storage integrity tag. Both encodings always derive from
//! the same 16 digest bytes.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use md5::{Digest, Md5};
use thiserror::Error;

/// Errors produced when decoding an encoded checksum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecksumError {
    #[error("invalid hex checksum: {0}")]
    InvalidHex(String),

    #[error("invalid base64 checksum: {0}")]
    InvalidBase64(String),

    #[error("checksum must be 16 bytes, got {0}")]
    InvalidLength(usize),
}

/// MD5 digest of an exact byte sequence
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Digest a byte sequence
    #[must_use]
    pub fn of_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let mut hasher = Md5::new();
        hasher.update(bytes.as_ref());
        Self(hasher.finalize().into())
    }

    /// Digest the UTF-8 encoding of `text`
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        Self::of_bytes(text.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex, as compared against download integrity tags
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard base64 with padding, as declared on upload
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    /// Parse a hex digest (either case)
    ///
    /// # Errors
    /// Fails if the input is not hex or does not decode to 16 bytes.
    pub fn from_hex(encoded: &str) -> Result<Self, ChecksumError> {
        let bytes = hex::decode(encoded).map_err(|e| ChecksumError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse a base64 digest
    ///
    /// # Errors
    /// Fails if the input is not base64 or does not decode to 16 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, ChecksumError> {
        let bytes =
            BASE64.decode(encoded).map_err(|e| ChecksumError::InvalidBase64(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, ChecksumError> {
        let digest: [u8; 16] =
            bytes.try_into().map_err(|_| ChecksumError::InvalidLength(bytes.len()))?;
        Ok(Self(digest))
    }

    /// Compare against a hex-encoded tag, ignoring ASCII case
    pub fn matches_hex(&self, tag: &str) -> bool {
        self.to_hex().eq_ignore_ascii_case(tag.trim())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Checksum").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
