//! Error types for reading and writing run artifacts.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving corpus data.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON-lines row is not valid JSON.
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON-lines row is valid JSON but not an object.
    #[error("line {line}: expected a JSON object")]
    NotAnObject { line: usize },

    /// An embeddings row is not a list of numbers.
    #[error("line {line}: embedding row must be an array or index-keyed object of numbers")]
    EmbeddingRow { line: usize },

    /// Serializing a row failed.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A run stamp does not match `%d_%m_%Y_%H%M%S`.
    #[error("invalid run stamp '{value}' (expected DD_MM_YYYY_HHMMSS)")]
    InvalidStamp { value: String },
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
