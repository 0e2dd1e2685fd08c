//! Corpus construction.
//!
//! Records are loaded elsewhere (see [`crate::persist`]) and handed to a
//! [`CorpusBuilder`], which runs two phases in order:
//!
//! 1. `transform` drops records without text, keeps the original text in
//!    `<column>_original`, trims Reddit posts to the sentences around their
//!    keyword and prepends the title.
//! 2. `clean` writes the normalized text to `<column>_clean` and removes
//!    duplicate or empty documents.
//!
//! The result is a [`BuiltCorpus`] whose modeling texts feed n-gram
//! extraction or an external topic pipeline.

mod builder;
mod error;
mod record;

pub use builder::{
    BuildPhase, BuiltCorpus, CLEAN_SUFFIX, CorpusBuilder, DataSource, KEYWORD_FIELD,
    ORIGINAL_SUFFIX, TITLE_FIELD,
};
pub use error::CorpusError;
pub use record::{
    Corpus, DIM0_FIELD, DIM1_FIELD, PROBABILITY_FIELD, Projection, Record, TOPIC_FIELD,
    TOPIC_NAME_FIELD, TOPIC_WORDS_FIELD, TopicEnrichment, TopicWord,
};
