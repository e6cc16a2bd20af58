//! # SHA3 Value Hashing
//!
//! One-shot hashing of a single value: a fresh sponge, one absorb, one
//! finalize.
//!
//! ## Size Argument
//!
//! Unlike [`Sha3Context::with_bits`], the public functions here are strict:
//! an explicit size outside {224, 256, 384, 512} is an
//! [`InvalidSizeParameter`] error. An absent size means 256. The size is
//! validated before the value is inspected, so an invalid size is reported
//! even for a NULL value.

use shathree_core::{DigestSize, InvalidSizeParameter, Sha3Digest, ValueRef};

use crate::sponge::Sha3Context;

/// Hash raw bytes at the given size.
pub fn sha3_digest(data: &[u8], size: DigestSize) -> Sha3Digest {
    let mut cx = Sha3Context::new(size);
    cx.absorb(data);
    cx.finalize()
}

/// SHA3-256 of raw bytes.
pub fn sha3_256(data: &[u8]) -> Sha3Digest {
    sha3_digest(data, DigestSize::Sha3_256)
}

/// Hash a runtime value.
///
/// Blobs are hashed as-is; text is hashed as its UTF-8 bytes with no
/// terminator; numbers are hashed as their SQL text rendering, so a float
/// hashes like the text `CAST(x AS TEXT)` would give. NULL and NaN yield
/// `Ok(None)`.
///
/// # Errors
///
/// Returns [`InvalidSizeParameter`] if `size` is `Some` and not one of the
/// four supported sizes.
pub fn sha3(
    value: ValueRef<'_>,
    size: Option<i64>,
) -> Result<Option<Sha3Digest>, InvalidSizeParameter> {
    let size = DigestSize::resolve(size)?;
    Ok(value.hash_bytes().map(|bytes| sha3_digest(&bytes, size)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_hashes_as_utf8_bytes() {
        let digest = sha3(ValueRef::Text("abc"), None).unwrap().unwrap();
        assert_eq!(
            digest.to_hex(),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn blob_and_text_with_same_bytes_agree() {
        let text = sha3(ValueRef::Text("abc"), Some(512)).unwrap();
        let blob = sha3(ValueRef::Blob(b"abc"), Some(512)).unwrap();
        assert_eq!(text, blob);
    }

    #[test]
    fn null_propagates() {
        assert_eq!(sha3(ValueRef::Null, Some(256)), Ok(None));
        assert_eq!(sha3(ValueRef::Null, None), Ok(None));
    }

    #[test]
    fn invalid_size_rejected_before_null_check() {
        assert_eq!(sha3(ValueRef::Null, Some(255)), Err(InvalidSizeParameter(255)));
        assert_eq!(sha3(ValueRef::Text("x"), Some(0)), Err(InvalidSizeParameter(0)));
    }

    #[test]
    fn omitted_size_is_256() {
        let omitted = sha3(ValueRef::Blob(b"data"), None).unwrap().unwrap();
        let explicit = sha3(ValueRef::Blob(b"data"), Some(256)).unwrap().unwrap();
        assert_eq!(omitted, explicit);
        assert_eq!(omitted.size(), DigestSize::Sha3_256);
    }

    #[test]
    fn every_supported_size_yields_its_length() {
        for bits in [224, 256, 384, 512] {
            let digest = sha3(ValueRef::Text(""), Some(bits)).unwrap().unwrap();
            assert_eq!(digest.as_bytes().len() as i64, bits / 8);
        }
    }

    #[test]
    fn integer_hashes_as_decimal_text() {
        assert_eq!(
            sha3(ValueRef::Integer(123), None).unwrap(),
            sha3(ValueRef::Text("123"), None).unwrap()
        );
    }

    #[test]
    fn float_hashes_as_sql_text() {
        assert_eq!(
            sha3(ValueRef::Float(0.1 + 0.2), None).unwrap(),
            Some(sha3_256(b"0.3"))
        );
        assert_eq!(
            sha3(ValueRef::Float(1e20), Some(384)).unwrap(),
            Some(sha3_digest(b"1.0e+20", DigestSize::Sha3_384))
        );
        assert_ne!(
            sha3(ValueRef::Float(1.0), None).unwrap(),
            sha3(ValueRef::Integer(1), None).unwrap()
        );
    }

    #[test]
    fn nan_hashes_like_null() {
        assert_eq!(sha3(ValueRef::Float(f64::NAN), None), Ok(None));
        assert_eq!(
            sha3(ValueRef::Float(f64::NAN), Some(7)),
            Err(InvalidSizeParameter(7))
        );
    }

    #[test]
    fn distinct_inputs_distinct_digests() {
        assert_ne!(sha3_256(b"a"), sha3_256(b"b"));
        assert_ne!(sha3_256(b""), sha3_256(b"\x00"));
    }
}
