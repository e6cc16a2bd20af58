//! # Digest Size
//!
//! The four SHA3 output sizes and the sponge parameters they imply.
//!
//! The sponge capacity is twice the output size rounded up to a multiple of
//! 32 bits; the rate is what remains of the 1600-bit state:
//!
//! | size | output bytes | rate bytes |
//! |------|--------------|------------|
//! | 224  | 28           | 144        |
//! | 256  | 32           | 136        |
//! | 384  | 48           | 104        |
//! | 512  | 64           | 72         |

use serde::{Deserialize, Serialize};

use crate::error::InvalidSizeParameter;

/// Width of the Keccak-f[1600] state in bytes.
pub const STATE_BYTES: usize = 200;

/// A supported SHA3 output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub enum DigestSize {
    /// SHA3-224.
    Sha3_224,
    /// SHA3-256, the default.
    Sha3_256,
    /// SHA3-384.
    Sha3_384,
    /// SHA3-512.
    Sha3_512,
}

impl DigestSize {
    /// All supported sizes, smallest first.
    pub const ALL: [DigestSize; 4] = [
        DigestSize::Sha3_224,
        DigestSize::Sha3_256,
        DigestSize::Sha3_384,
        DigestSize::Sha3_512,
    ];

    /// Strict constructor for user-supplied sizes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSizeParameter`] for anything other than 224, 256,
    /// 384 or 512.
    pub fn from_bits(bits: i64) -> Result<Self, InvalidSizeParameter> {
        match bits {
            224 => Ok(Self::Sha3_224),
            256 => Ok(Self::Sha3_256),
            384 => Ok(Self::Sha3_384),
            512 => Ok(Self::Sha3_512),
            other => Err(InvalidSizeParameter(other)),
        }
    }

    /// Resolve an optional size argument: absent means 256.
    pub fn resolve(bits: Option<i64>) -> Result<Self, InvalidSizeParameter> {
        bits.map_or(Ok(Self::default()), Self::from_bits)
    }

    /// Lenient constructor used when initializing a sponge directly.
    /// Unsupported values (including 0) fall back to 256.
    pub fn from_bits_or_default(bits: u32) -> Self {
        Self::from_bits(i64::from(bits)).unwrap_or_default()
    }

    /// Output size in bits.
    pub fn bits(self) -> u32 {
        match self {
            Self::Sha3_224 => 224,
            Self::Sha3_256 => 256,
            Self::Sha3_384 => 384,
            Self::Sha3_512 => 512,
        }
    }

    /// Output size in bytes.
    pub fn output_len(self) -> usize {
        self.bits() as usize / 8
    }

    /// Bytes absorbed per permutation call.
    pub fn rate(self) -> usize {
        let capacity_bits = ((self.bits() as usize + 31) & !31) * 2;
        (STATE_BYTES * 8 - capacity_bits) / 8
    }

    /// Algorithm name, e.g. `sha3-256`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
        }
    }
}

impl Default for DigestSize {
    fn default() -> Self {
        Self::Sha3_256
    }
}

impl std::fmt::Display for DigestSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for DigestSize {
    type Error = InvalidSizeParameter;

    fn try_from(bits: i64) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<DigestSize> for u32 {
    fn from(size: DigestSize) -> Self {
        size.bits()
    }
}
