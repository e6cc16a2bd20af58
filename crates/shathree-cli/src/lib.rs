//! # shathree-cli: SHA3 and Query Hashing from the Command Line
//!
//! ## Subcommands
//!
//! - `hash`: SHA3 digest of files, a literal string, or stdin
//! - `query`: digest of the canonical result stream of SQL run against a
//!   catalog
//! - `catalog`: validate a catalog file or list per-statement digests
//!
//! Digests print as lowercase hex. `--expect` compares against a known
//! digest and exits with status 1 on mismatch.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take parsed args
//!   and an output writer so they can be tested without a process.
//! - Handlers return `anyhow::Result<u8>`: the exit code on success.

use anyhow::{Context, Result};
use shathree_core::{DigestSize, Sha3Digest};

pub mod catalog;
pub mod hash;
pub mod query;

/// clap value parser for `--size`: one of 224, 256, 384 or 512.
pub fn parse_size(s: &str) -> Result<DigestSize, String> {
    let bits: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {s}"))?;
    DigestSize::from_bits(bits).map_err(|e| e.to_string())
}

/// Compare a digest against an expected value given as bare hex or as
/// `sha3-<bits>:<hex>`.
///
/// # Errors
///
/// Fails if `expected` is not a well-formed digest of the same size.
pub fn matches_expected(digest: &Sha3Digest, expected: &str) -> Result<bool> {
    let expected = expected.trim();
    let parsed = if expected.contains(':') {
        expected
            .parse::<Sha3Digest>()
            .with_context(|| format!("invalid expected digest: {expected}"))?
    } else {
        Sha3Digest::from_hex(digest.size(), expected)
            .with_context(|| format!("invalid expected {} digest", digest.size()))?
    };
    if parsed.size() != digest.size() {
        anyhow::bail!(
            "expected digest is {} but computed digest is {}",
            parsed.size(),
            digest.size()
        );
    }
    Ok(parsed == *digest)
}
