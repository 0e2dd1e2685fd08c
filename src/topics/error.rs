//! Error types for the topic pipeline boundary.

use thiserror::Error;

/// Errors raised while exchanging data with the embedding and clustering
/// collaborators.
#[derive(Debug, Error)]
pub enum TopicError {
    /// A collaborator returned a different number of rows than the corpus has.
    #[error("{what} has {actual} rows but the corpus has {expected} records")]
    LengthMismatch {
        /// Which result was merged.
        what: &'static str,
        /// Records in the corpus.
        expected: usize,
        /// Rows returned.
        actual: usize,
    },

    /// A record was assigned a topic the clusterer has no name for.
    #[error("topic {topic} has no entry in the topic info table")]
    UnknownTopic {
        /// The unnamed topic.
        topic: i64,
    },

    /// A step ran before the one producing its input.
    #[error("{step} requires {missing}; run it first")]
    MissingStep {
        /// The step attempted.
        step: &'static str,
        /// What it needs.
        missing: &'static str,
    },

    /// The external model failed.
    #[error("{stage} failed: {message}")]
    Collaborator {
        /// Embedding, clustering or projection.
        stage: &'static str,
        /// Collaborator's message.
        message: String,
    },
}
