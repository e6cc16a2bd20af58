//! # Streaming Hasher
//!
//! `Sha3Hasher` adapts the sponge to [`std::io::Write`] so files and pipes
//! can be hashed with `std::io::copy` in constant memory.

use std::io::{self, Read, Write};

use shathree_core::{DigestSize, Sha3Digest};

use crate::sponge::Sha3Context;

/// An `io::Write` sink that hashes everything written to it.
#[derive(Debug, Clone)]
pub struct Sha3Hasher {
    cx: Sha3Context,
    written: u64,
}

impl Sha3Hasher {
    /// Start a new streaming hash.
    pub fn new(size: DigestSize) -> Self {
        Self {
            cx: Sha3Context::new(size),
            written: 0,
        }
    }

    /// Append bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.cx.absorb(data);
        self.written += data.len() as u64;
    }

    /// Total bytes hashed so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Finish and return the digest.
    pub fn finalize(self) -> Sha3Digest {
        self.cx.finalize()
    }
}

impl Write for Sha3Hasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hash everything readable from `reader`.
///
/// # Errors
///
/// Propagates any read error from `reader`.
pub fn sha3_reader<R: Read>(mut reader: R, size: DigestSize) -> io::Result<Sha3Digest> {
    let mut hasher = Sha3Hasher::new(size);
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize())
}
