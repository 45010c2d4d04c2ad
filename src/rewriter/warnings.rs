//! Per-statement rewrite failures.
//!
//! None of these abort a run: the pipeline records them and leaves the
//! statement out of the output.

use serde::Serialize;

/// Reason a statement could not be rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewriteWarning {
    /// No `INSERT INTO <table> (<cols>)` header for the target table
    MissingColumns { table: String },
    /// No `SELECT` follows the column list
    MissingSelect,
    /// A parenthesized `SELECT` survived substitution
    UnresolvedSubquery { fragment: String },
    /// A string literal in the value list is never closed
    UnterminatedString { fragment: String },
    /// More values than columns
    TooManyValues { columns: usize, values: usize },
}

impl std::fmt::Display for RewriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteWarning::MissingColumns { table } => {
                write!(f, "no column list for table '{}'", table)
            }
            RewriteWarning::MissingSelect => write!(f, "no SELECT clause after column list"),
            RewriteWarning::UnresolvedSubquery { fragment } => {
                write!(f, "unrecognized subquery: {}", fragment)
            }
            RewriteWarning::UnterminatedString { fragment } => {
                write!(f, "unterminated string: {}", fragment)
            }
            RewriteWarning::TooManyValues { columns, values } => {
                write!(f, "{} values for {} columns", values, columns)
            }
        }
    }
}

impl std::error::Error for RewriteWarning {}
