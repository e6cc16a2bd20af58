//! Lowercase hex rendering shared by digests and blob fixtures.

use crate::error::DigestParseError;

pub(crate) fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn decode_into(hex: &str, out: &mut [u8]) -> Result<(), DigestParseError> {
    let expected = out.len() * 2;
    if hex.len() != expected {
        return Err(DigestParseError::Length {
            expected,
            actual: hex.len(),
        });
    }
    for (i, pair) in hex.as_bytes().chunks_exact(2).enumerate() {
        out[i] = (nibble(pair[0], 2 * i)? << 4) | nibble(pair[1], 2 * i + 1)?;
    }
    Ok(())
}

pub(crate) fn decode(hex: &str) -> Result<Vec<u8>, DigestParseError> {
    let mut out = vec![0u8; (hex.len() + 1) / 2];
    decode_into(hex, &mut out)?;
    Ok(out)
}

fn nibble(c: u8, offset: usize) -> Result<u8, DigestParseError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(DigestParseError::InvalidChar {
            found: char::from(c),
            offset,
        }),
    }
}
