//! # shathree-query: Query Result Hashing
//!
//! Computes a single SHA3 digest over the complete results of one or more
//! SQL statements, so two result sets can be compared by digest alone.
//!
//! ## Architecture
//!
//! - [`engine`] defines the collaborator boundary: [`QueryEngine`] compiles
//!   statements and [`PreparedStatement`] steps through their rows. Any
//!   relational engine can sit behind it.
//! - [`serializer`] drives an engine and hashes the canonical record stream
//!   ([`hash_query`]).
//! - [`memory`] is a catalog-backed engine for fixtures, pinned hashes and
//!   the CLI.
//!
//! ## Guarantees
//!
//! - Only read-only statements are run. A write statement aborts the call
//!   before it is stepped.
//! - Every value is encoded through
//!   [`CanonicalRecord`](shathree_core::CanonicalRecord); the stream is
//!   prefix-free, so distinct result sets never share an encoding.
//! - One sponge spans all statements in the input.

pub mod engine;
pub mod error;
pub mod memory;
pub mod serializer;

pub use engine::{Compiled, EngineError, PreparedStatement, QueryEngine};
pub use error::QueryHashError;
pub use memory::{Catalog, CatalogEntry, MemoryEngine, MemoryStatement};
pub use serializer::{canonical_stream, hash_query, serialize_results, SerializeStats};
