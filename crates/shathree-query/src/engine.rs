//! # Query Engine Interface
//!
//! The capability-style collaborator the result serializer drives. The
//! engine owns parsing, planning, storage and execution; this crate only
//! consumes the rows it yields.
//!
//! ## Contract
//!
//! - [`QueryEngine::compile`] takes the remaining input text and returns at
//!   most one statement plus the unconsumed tail. It must consume at least
//!   one byte of non-empty input. A `None` statement means the consumed
//!   text held nothing to run (whitespace, bare separators).
//! - On a compile failure the caller reports the exact text it passed to
//!   [`QueryEngine::compile`]: the input from the start of the failing
//!   statement to the end, earlier statements excluded. The engine returns
//!   only its diagnostic.
//! - [`PreparedStatement::sql`] is the exact compiled text of the statement.
//!   It is hashed verbatim.
//! - [`PreparedStatement::step`] advances to the next row, returning
//!   `false` once rows are exhausted. Column accessors refer to the current
//!   row.
//!
//! Calls are blocking with no timeout. Cancellation belongs to the engine
//! (e.g. an interrupt flag) and surfaces as an [`EngineError`].

use shathree_core::{ValueRef, ValueType};
use thiserror::Error;

/// A diagnostic from the query engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    /// Wrap an engine diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of compiling the head of the input text.
#[derive(Debug)]
pub struct Compiled<'t, S> {
    /// The compiled statement, or `None` if the consumed text held none.
    pub statement: Option<S>,
    /// Input left after the consumed statement.
    pub tail: &'t str,
}

/// A compiled statement and its row cursor.
pub trait PreparedStatement {
    /// Exact compiled SQL text.
    fn sql(&self) -> &str;

    /// Whether running the statement leaves the data source unchanged.
    fn is_read_only(&self) -> bool;

    /// Number of result columns. May be zero.
    fn column_count(&self) -> usize;

    /// Advance to the next row. Returns `Ok(false)` at end of rows.
    fn step(&mut self) -> Result<bool, EngineError>;

    /// Value of column `index` in the current row.
    fn column(&self, index: usize) -> ValueRef<'_>;

    /// Runtime type of column `index` in the current row.
    fn column_type(&self, index: usize) -> ValueType {
        self.column(index).value_type()
    }
}

/// A source of compiled statements.
pub trait QueryEngine {
    /// The statement type this engine produces.
    type Statement: PreparedStatement;

    /// Compile the next statement from `sql`.
    fn compile<'t>(&self, sql: &'t str) -> Result<Compiled<'t, Self::Statement>, EngineError>;
}

impl<E: QueryEngine + ?Sized> QueryEngine for &E {
    type Statement = E::Statement;

    fn compile<'t>(&self, sql: &'t str) -> Result<Compiled<'t, Self::Statement>, EngineError> {
        (**self).compile(sql)
    }
}
