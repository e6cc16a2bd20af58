//! # shathree-core: Foundational Types for shathree
//!
//! This crate is the leaf of the shathree workspace. It defines the value
//! types shared by the hash engine (`shathree-crypto`) and the result
//! serializer (`shathree-query`). It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`DigestSize` is a closed enum.** Only 224, 256, 384 and 512 bit
//!    digests exist. The strict constructor rejects everything else; the
//!    lenient one used by the sponge falls back to 256.
//!
//! 2. **`Sha3Digest` carries its size.** The byte length is always exactly
//!    `size.output_len()`; there is no way to build a digest of the wrong
//!    length.
//!
//! 3. **`CanonicalRecord` is the only serialization path for query results.**
//!    Every value that reaches the sponge from a result set is encoded through
//!    the six-shape tagged grammar. No ad-hoc formatting of rows.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shathree-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
mod hex;
pub mod size;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::{CanonicalRecord, RecordHeader, RecordSink};
pub use digest::Sha3Digest;
pub use error::{DigestParseError, InvalidSizeParameter};
pub use size::DigestSize;
pub use value::{Value, ValueRef, ValueType};
