//! # Query Hashing Errors
//!
//! Every failure aborts the whole `hash_query` call: no digest is returned
//! and any partially absorbed state is dropped. Nothing is retried.

use shathree_core::InvalidSizeParameter;
use thiserror::Error;

/// Errors from hashing the results of one or more statements.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryHashError {
    /// The explicit digest size is not 224, 256, 384 or 512.
    #[error(transparent)]
    InvalidSize(#[from] InvalidSizeParameter),

    /// The engine could not compile the next statement.
    #[error("error SQL statement [{remaining}]: {message}")]
    Compile {
        /// Diagnostic from the engine.
        message: String,
        /// The unconsumed input, starting at the failed statement.
        remaining: String,
    },

    /// A statement would modify the data source.
    #[error("non-query: [{sql}]")]
    WriteStatementRejected {
        /// Compiled text of the offending statement.
        sql: String,
    },

    /// The engine failed while producing rows.
    #[error("error executing SQL statement [{sql}]: {message}")]
    Execution {
        /// Compiled text of the failing statement.
        sql: String,
        /// Diagnostic from the engine.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_size_is_transparent() {
        let err = QueryHashError::from(InvalidSizeParameter(255));
        assert_eq!(
            format!("{err}"),
            format!("{}", InvalidSizeParameter(255))
        );
    }

    #[test]
    fn compile_display_includes_remaining_text_and_diagnostic() {
        let err = QueryHashError::Compile {
            message: "near \"SELEC\": syntax error".to_string(),
            remaining: "SELEC 1".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("[SELEC 1]"));
        assert!(msg.contains("syntax error"));
    }

    #[test]
    fn write_rejection_names_statement() {
        let err = QueryHashError::WriteStatementRejected {
            sql: "DELETE FROM t".to_string(),
        };
        assert_eq!(format!("{err}"), "non-query: [DELETE FROM t]");
    }

    #[test]
    fn execution_display() {
        let err = QueryHashError::Execution {
            sql: "SELECT * FROM t".to_string(),
            message: "interrupted".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("SELECT * FROM t"));
        assert!(msg.contains("interrupted"));
    }
}
