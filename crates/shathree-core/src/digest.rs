//! # SHA3 Digest
//!
//! Defines `Sha3Digest`, the immutable output of a finalized sponge.
//!
//! The digest is raw binary at the API boundary. Hex rendering (`to_hex`,
//! `Display`) exists for callers that present digests to humans; the core
//! hashing path never applies a text encoding.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigestParseError;
use crate::hex;
use crate::size::{DigestSize, STATE_BYTES};

/// Largest digest length in bytes (SHA3-512).
pub const MAX_OUTPUT_LEN: usize = 64;

/// A finalized SHA3 digest tagged with its size.
///
/// # Invariants
///
/// - Exactly `size.output_len()` bytes are meaningful; the tail of the
///   backing array is always zero, so derived equality and hashing are exact.
/// - Built only from the leading bytes of a sponge state
///   ([`Sha3Digest::from_state`]) or parsed from hex. The type records the
///   size and length of a digest; it does not prove which input produced
///   it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha3Digest {
    size: DigestSize,
    bytes: [u8; MAX_OUTPUT_LEN],
}

impl Sha3Digest {
    /// Squeeze a digest out of a finalized sponge state: the leading
    /// `size.output_len()` bytes of the byte view. Bytes past that prefix
    /// are ignored.
    #[doc(hidden)]
    pub fn from_state(size: DigestSize, state: &[u8; STATE_BYTES]) -> Self {
        let len = size.output_len();
        let mut bytes = [0u8; MAX_OUTPUT_LEN];
        bytes[..len].copy_from_slice(&state[..len]);
        Self { size, bytes }
    }

    /// The digest size.
    pub fn size(&self) -> DigestSize {
        self.size
    }

    /// The raw digest bytes, exactly `size().output_len()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size.output_len()]
    }

    /// Copy the digest bytes into a `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Parse a bare hex digest of the given size (either case).
    ///
    /// # Errors
    ///
    /// Returns [`DigestParseError::Length`] if the string does not hold
    /// exactly `size.output_len()` bytes, or
    /// [`DigestParseError::InvalidChar`] on a non-hex character.
    pub fn from_hex(size: DigestSize, digits: &str) -> Result<Self, DigestParseError> {
        let mut bytes = [0u8; MAX_OUTPUT_LEN];
        hex::decode_into(digits, &mut bytes[..size.output_len()])?;
        Ok(Self { size, bytes })
    }
}

impl AsRef<[u8]> for Sha3Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Display for Sha3Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.size, self.to_hex())
    }
}

impl FromStr for Sha3Digest {
    type Err = DigestParseError;

    /// Parse the `sha3-<bits>:<hex>` rendering produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (algorithm, digits) = s
            .split_once(':')
            .ok_or_else(|| DigestParseError::Algorithm(s.to_string()))?;
        let size = DigestSize::ALL
            .into_iter()
            .find(|size| size.as_str() == algorithm)
            .ok_or_else(|| DigestParseError::Algorithm(algorithm.to_string()))?;
        Self::from_hex(size, digits)
    }
}

impl TryFrom<String> for Sha3Digest {
    type Error = DigestParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Sha3Digest> for String {
    fn from(digest: Sha3Digest) -> Self {
        digest.to_string()
    }
}
