//! Error types for n-gram extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring n-gram extraction.
#[derive(Debug, Error)]
pub enum NgramError {
    /// The n-gram size is not a positive integer, even after rounding.
    #[error("invalid n-gram size {value}: expected a positive integer")]
    InvalidSize {
        /// Requested size, as given.
        value: f64,
    },

    /// Default stopwords were requested for a language without a list.
    #[error(
        "no stopword list available for language '{language}'\n  Suggestion: provide a custom stopword file or disable default stopwords"
    )]
    StopwordsUnavailable {
        /// The requested language.
        language: String,
    },

    /// Custom stopword file could not be read.
    #[error("cannot read stopwords file '{path}': {source}")]
    StopwordsFile {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
