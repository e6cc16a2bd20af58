//! # shathree-crypto: SHA3 Hash Engine
//!
//! Provides the SHA3 (FIPS 202) hash family at 224, 256, 384 and 512 bits:
//!
//! - **Keccak-f[1600]** permutation over a byte-addressed state with
//!   explicit little-endian lane accessors.
//! - **Sponge** (`Sha3Context`) with streaming absorption in O(1) memory
//!   and SHA3 domain-separation padding.
//! - **Value hashing** (`sha3`) with NULL propagation and strict size
//!   validation.
//! - **Streaming** (`Sha3Hasher`) through `std::io::Write`.
//!
//! ## Crate Policy
//!
//! - Depends only on `shathree-core` internally.
//! - No `unsafe`. No allocation on the absorb path.
//! - Known-answer tests use official SHA3 vectors; property tests
//!   cross-check against the RustCrypto `sha3` and `keccak` crates.

pub mod hash;
pub mod hasher;
pub mod permutation;
pub mod sponge;

// Re-export primary types.
pub use hash::{sha3, sha3_256, sha3_digest};
pub use hasher::{sha3_reader, Sha3Hasher};
pub use permutation::{keccak_f1600, KeccakState};
pub use sponge::Sha3Context;
