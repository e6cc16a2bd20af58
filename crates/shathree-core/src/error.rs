//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Query-level failures (compilation, write rejection) live in
//! `shathree-query`, next to the collaborator that produces them.

use thiserror::Error;

/// An explicit digest size outside {224, 256, 384, 512}. Carries the
/// rejected value; the message does not.
///
/// This is a user error: no hashing is performed and no partial output is
/// produced. An *absent* size is never an error, it means 256.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("SHA3 size should be one of: 224 256 384 512")]
pub struct InvalidSizeParameter(pub i64);

/// A hex-rendered digest could not be parsed back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestParseError {
    /// The `<algorithm>:` prefix is missing or names an unknown size.
    #[error("unknown digest algorithm: {0:?}")]
    Algorithm(String),

    /// The hex string encodes the wrong number of bytes for the size.
    #[error("expected {expected} hex digits, got {actual}")]
    Length {
        /// Number of hex characters required by the digest size.
        expected: usize,
        /// Number of hex characters supplied.
        actual: usize,
    },

    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {found:?} at offset {offset}")]
    InvalidChar {
        /// The offending character.
        found: char,
        /// Byte offset in the input.
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_size_display_is_the_fixed_message() {
        let err = InvalidSizeParameter(255);
        assert_eq!(
            format!("{err}"),
            "SHA3 size should be one of: 224 256 384 512"
        );
        assert_eq!(err.0, 255);
    }

    #[test]
    fn digest_parse_length_display() {
        let err = DigestParseError::Length {
            expected: 64,
            actual: 3,
        };
        let msg = format!("{err}");
        assert!(msg.contains("64"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn digest_parse_invalid_char_display() {
        let err = DigestParseError::InvalidChar {
            found: 'z',
            offset: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("'z'"));
        assert!(msg.contains('7'));
    }
}
