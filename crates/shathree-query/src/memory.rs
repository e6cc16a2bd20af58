//! # In-Memory Query Engine
//!
//! A [`QueryEngine`] backed by a catalog of canned statements. Each entry
//! maps one SQL statement to its result columns and rows, plus whether the
//! statement is read-only. It lets result hashes be computed and pinned
//! without a database, and gives the CLI a data source that can be checked
//! into version control as YAML or JSON.
//!
//! ## Splitting
//!
//! `compile` consumes text up to and including the first `;` that is not
//! inside a `'…'`, `"…"` or `` `…` `` quoted section (doubled quotes stay
//! inside the section). Text without a terminator is consumed whole. The
//! compiled statement text is the consumed slice with leading whitespace
//! removed. A consumed slice holding only whitespace and `;` compiles to no
//! statement.
//!
//! ## Lookup
//!
//! Statements are matched by their normalized text: surrounding whitespace
//! and trailing `;` removed. Matching is otherwise exact.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shathree_core::{Value, ValueRef};

use crate::engine::{Compiled, EngineError, PreparedStatement, QueryEngine};

/// A set of canned statements, as stored in a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// The statements, in file order.
    #[serde(default)]
    pub statements: Vec<CatalogEntry>,
}

/// One canned statement and its result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The statement text. Matched after normalization.
    pub sql: String,
    /// Whether running the statement leaves the data unchanged.
    #[serde(default = "default_read_only")]
    pub read_only: bool,
    /// Result column names. Their count fixes the width of every row.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Result rows, in order.
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

fn default_read_only() -> bool {
    true
}

impl CatalogEntry {
    /// A read-only statement with the given columns and rows.
    pub fn query<C, R>(sql: impl Into<String>, columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<Value>>,
    {
        Self {
            sql: sql.into(),
            read_only: true,
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter().collect(),
        }
    }

    /// A statement that modifies data and returns nothing.
    pub fn write(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            read_only: false,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if normalize(&self.sql).is_empty() {
            return Err(EngineError::new("catalog statement has empty SQL text"));
        }
        match split_statement(&self.sql) {
            Err(e) => {
                return Err(EngineError::new(format!("catalog statement [{}]: {e}", self.sql)));
            }
            Ok((_, rest)) if !normalize(rest).is_empty() => {
                return Err(EngineError::new(format!(
                    "catalog statement [{}] holds more than one statement",
                    self.sql
                )));
            }
            Ok(_) => {}
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(EngineError::new(format!(
                    "row {i} of [{}] has {} values, expected {}",
                    self.sql,
                    row.len(),
                    self.columns.len()
                )));
            }
        }
        Ok(())
    }
}

/// A registered entry and its execution counter.
#[derive(Debug)]
struct Canned {
    entry: CatalogEntry,
    executions: AtomicUsize,
}

/// A [`QueryEngine`] that serves canned results.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    statements: BTreeMap<String, Arc<Canned>>,
}

impl MemoryEngine {
    /// An engine with no statements. Any non-empty SQL fails to compile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine from a catalog.
    ///
    /// # Errors
    ///
    /// Fails if any entry is invalid (see [`MemoryEngine::register`]).
    pub fn from_catalog(catalog: Catalog) -> Result<Self, EngineError> {
        let mut engine = Self::new();
        for entry in catalog.statements {
            engine.register(entry)?;
        }
        Ok(engine)
    }

    /// Add a statement.
    ///
    /// # Errors
    ///
    /// Fails if the SQL text is empty or has an unterminated quote, if a row
    /// width differs from the column count, or if a statement with the same
    /// normalized text is already registered.
    pub fn register(&mut self, entry: CatalogEntry) -> Result<(), EngineError> {
        entry.validate()?;
        let key = normalize(&entry.sql).to_string();
        if self.statements.contains_key(&key) {
            return Err(EngineError::new(format!("duplicate catalog statement: {key}")));
        }
        tracing::trace!(sql = %key, rows = entry.rows.len(), "registered statement");
        self.statements.insert(
            key,
            Arc::new(Canned {
                entry,
                executions: AtomicUsize::new(0),
            }),
        );
        Ok(())
    }

    /// Builder form of [`MemoryEngine::register`].
    ///
    /// # Errors
    ///
    /// See [`MemoryEngine::register`].
    pub fn with(mut self, entry: CatalogEntry) -> Result<Self, EngineError> {
        self.register(entry)?;
        Ok(self)
    }

    /// Number of registered statements.
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether no statements are registered.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// How many times the statement with this text has been stepped from
    /// the start. Zero for unknown statements.
    pub fn executions(&self, sql: &str) -> usize {
        self.statements
            .get(normalize(sql))
            .map_or(0, |c| c.executions.load(Ordering::Relaxed))
    }

    /// Snapshot of the registered entries, ordered by normalized text.
    pub fn catalog(&self) -> Catalog {
        Catalog {
            statements: self.statements.values().map(|c| c.entry.clone()).collect(),
        }
    }
}

impl QueryEngine for MemoryEngine {
    type Statement = MemoryStatement;

    fn compile<'t>(&self, sql: &'t str) -> Result<Compiled<'t, MemoryStatement>, EngineError> {
        let (head, tail) = split_statement(sql)?;
        let key = normalize(head);
        if key.is_empty() {
            return Ok(Compiled {
                statement: None,
                tail,
            });
        }
        let canned = self
            .statements
            .get(key)
            .ok_or_else(|| EngineError::new(format!("no such statement: {key}")))?;
        Ok(Compiled {
            statement: Some(MemoryStatement {
                canned: Arc::clone(canned),
                sql: head.trim_start().to_string(),
                cursor: None,
            }),
            tail,
        })
    }
}

/// A compiled statement from a [`MemoryEngine`].
#[derive(Debug)]
pub struct MemoryStatement {
    canned: Arc<Canned>,
    sql: String,
    /// Index of the current row. `None` before the first step.
    cursor: Option<usize>,
}

impl MemoryStatement {
    fn current_row(&self) -> Option<&[Value]> {
        self.cursor
            .and_then(|i| self.canned.entry.rows.get(i))
            .map(Vec::as_slice)
    }
}

impl PreparedStatement for MemoryStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn is_read_only(&self) -> bool {
        self.canned.entry.read_only
    }

    fn column_count(&self) -> usize {
        self.canned.entry.columns.len()
    }

    fn step(&mut self) -> Result<bool, EngineError> {
        let next = match self.cursor {
            None => {
                self.canned.executions.fetch_add(1, Ordering::Relaxed);
                0
            }
            Some(i) => i + 1,
        };
        let rows = self.canned.entry.rows.len();
        self.cursor = Some(next.min(rows));
        Ok(next < rows)
    }

    /// Out-of-range columns, and any column before the first step or after
    /// the last row, read as NULL.
    fn column(&self, index: usize) -> ValueRef<'_> {
        self.current_row()
            .and_then(|row| row.get(index))
            .map_or(ValueRef::Null, Value::as_value_ref)
    }
}

/// Split off the first statement: up to and including the first unquoted
/// `;`, or the whole text if there is none.
fn split_statement(sql: &str) -> Result<(&str, &str), EngineError> {
    let mut quote: Option<u8> = None;
    for (i, b) in sql.bytes().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b';' => return Ok(sql.split_at(i + 1)),
                _ => {}
            },
        }
    }
    match quote {
        Some(q) => Err(EngineError::new(format!(
            "unrecognized token: unterminated {} quote",
            q as char
        ))),
        None => Ok((sql, "")),
    }
}

/// Lookup key for a statement: surrounding whitespace and trailing `;`
/// removed.
fn normalize(sql: &str) -> &str {
    let mut s = sql.trim();
    while let Some(rest) = s.strip_suffix(';') {
        s = rest.trim_end();
    }
    s
}
