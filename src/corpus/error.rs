//! Error types for corpus construction.

use thiserror::Error;

use super::builder::BuildPhase;

/// Errors that stop corpus construction.
///
/// All of them are fatal: the builder is consumed and no partially cleaned
/// corpus is handed out.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A required column is not part of the input schema.
    #[error(
        "'{column}' is not a column of the provided data (available: {available})\n  Suggestion: check the text column name or the data source"
    )]
    MissingColumn {
        /// The requested column.
        column: String,
        /// Columns actually present, comma separated.
        available: String,
    },

    /// The text field of a record holds something other than a string.
    #[error("record {row} has a non-text value in '{column}': {value}")]
    NonTextValue {
        /// Zero-based position of the record in the input.
        row: usize,
        /// Column being read.
        column: String,
        /// Offending value, rendered as JSON.
        value: String,
    },

    /// A phase was run before the phase it depends on.
    #[error("cannot run {requested} while the corpus is {current}")]
    PhaseOrder {
        /// Phase the builder was in.
        current: BuildPhase,
        /// Operation that was attempted.
        requested: &'static str,
    },
}

impl CorpusError {
    /// Creates a `MissingColumn` error listing the available columns.
    #[must_use]
    pub fn missing_column(column: &str, available: &[String]) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            available: if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            },
        }
    }
}
