//! # Result Serializer
//!
//! Runs every statement in a SQL text through a [`QueryEngine`], encodes the
//! statement text and every result value as [`CanonicalRecord`]s, and feeds
//! the stream into a single SHA3 sponge.
//!
//! ## Stream Layout
//!
//! For each compiled statement, in input order:
//!
//! ```text
//! S<n>:<sql>   then, per row:   R  <value record per column>
//! ```
//!
//! All statements share one sponge, so the digest covers the whole
//! multi-statement text. Statement text is part of the stream: two texts
//! that compile differently hash differently even when their rows match.
//!
//! ## Failure
//!
//! Any compile failure, write statement, or execution failure aborts the
//! call. No digest is produced and the partial sponge is dropped.

use shathree_core::{CanonicalRecord, DigestSize, RecordSink, Sha3Digest};
use shathree_crypto::Sha3Context;

use crate::engine::{Compiled, PreparedStatement, QueryEngine};
use crate::error::QueryHashError;

/// Counts gathered while serializing a result stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeStats {
    /// Statements compiled and run. Skipped empty statements are not counted.
    pub statements: usize,
    /// Rows across all statements.
    pub rows: u64,
    /// Bytes written to the sink.
    pub bytes: u64,
}

/// Hash the results of every statement in `sql`.
///
/// `size` is the digest size in bits; `None` means 256. The size is
/// validated before anything else, so an invalid size is reported even when
/// `sql` is `None`. A `None` SQL text yields `Ok(None)` without touching the
/// engine.
///
/// # Errors
///
/// - [`QueryHashError::InvalidSize`] for an explicit size other than 224,
///   256, 384 or 512.
/// - [`QueryHashError::Compile`] when the engine rejects a statement.
/// - [`QueryHashError::WriteStatementRejected`] for a statement that is not
///   read-only. It is rejected before it is stepped.
/// - [`QueryHashError::Execution`] when the engine fails mid-statement.
pub fn hash_query<E>(
    engine: &E,
    sql: Option<&str>,
    size: Option<i64>,
) -> Result<Option<Sha3Digest>, QueryHashError>
where
    E: QueryEngine + ?Sized,
{
    let size = DigestSize::resolve(size)?;
    let Some(sql) = sql else {
        return Ok(None);
    };

    let mut cx = Sha3Context::new(size);
    let stats = serialize_results(engine, sql, &mut cx)?;
    let digest = cx.finalize();
    tracing::debug!(
        size = size.bits(),
        statements = stats.statements,
        rows = stats.rows,
        bytes = stats.bytes,
        "query results hashed"
    );
    Ok(Some(digest))
}

/// The canonical byte stream that [`hash_query`] would hash, for inspection.
///
/// # Errors
///
/// Same as [`hash_query`], minus the size check.
pub fn canonical_stream<E>(engine: &E, sql: &str) -> Result<Vec<u8>, QueryHashError>
where
    E: QueryEngine + ?Sized,
{
    let mut stream = Vec::new();
    serialize_results(engine, sql, &mut stream)?;
    Ok(stream)
}

/// Run every statement in `sql` and write its canonical records to `sink`.
///
/// On error the sink may hold a partial stream; callers discard it.
///
/// # Errors
///
/// See [`hash_query`].
pub fn serialize_results<E, S>(
    engine: &E,
    sql: &str,
    sink: &mut S,
) -> Result<SerializeStats, QueryHashError>
where
    E: QueryEngine + ?Sized,
    S: RecordSink + ?Sized,
{
    let mut sink = CountingSink { inner: sink, bytes: 0 };
    let mut stats = SerializeStats::default();
    let mut remaining = sql;

    while !remaining.is_empty() {
        let Compiled { statement, tail } =
            engine.compile(remaining).map_err(|e| QueryHashError::Compile {
                message: e.message().to_string(),
                remaining: remaining.to_string(),
            })?;

        if tail.len() >= remaining.len() {
            return Err(QueryHashError::Compile {
                message: "statement compiler consumed no input".to_string(),
                remaining: remaining.to_string(),
            });
        }

        if let Some(mut statement) = statement {
            stats.rows += serialize_statement(&mut statement, &mut sink)?;
            stats.statements += 1;
        }
        remaining = tail;
    }

    stats.bytes = sink.bytes;
    Ok(stats)
}

/// Write one statement's `S` record and all of its rows. Returns the row
/// count.
fn serialize_statement<P, S>(statement: &mut P, sink: &mut S) -> Result<u64, QueryHashError>
where
    P: PreparedStatement + ?Sized,
    S: RecordSink + ?Sized,
{
    if !statement.is_read_only() {
        tracing::warn!(sql = statement.sql(), "rejecting statement that writes");
        return Err(QueryHashError::WriteStatementRejected {
            sql: statement.sql().to_string(),
        });
    }

    let columns = statement.column_count();
    tracing::debug!(sql = statement.sql(), columns, "hashing statement");
    CanonicalRecord::Statement(statement.sql()).write_to(sink);

    let mut rows = 0u64;
    loop {
        match statement.step() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                return Err(QueryHashError::Execution {
                    sql: statement.sql().to_string(),
                    message: e.message().to_string(),
                });
            }
        }
        CanonicalRecord::Row.write_to(sink);
        for i in 0..columns {
            CanonicalRecord::from_value(statement.column(i)).write_to(sink);
        }
        rows += 1;
    }

    tracing::trace!(sql = statement.sql(), rows, "statement exhausted");
    Ok(rows)
}

/// Forwards to another sink while counting bytes.
struct CountingSink<'s, S: ?Sized> {
    inner: &'s mut S,
    bytes: u64,
}

impl<S: RecordSink + ?Sized> RecordSink for CountingSink<'_, S> {
    fn absorb(&mut self, bytes: &[u8]) {
        self.bytes += bytes.len() as u64;
        self.inner.absorb(bytes);
    }
}
