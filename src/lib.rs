//! Topic Modeler Core Library
//!
//! Turns raw social-media posts into a clean text corpus ready for topic
//! modeling and n-gram analysis.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`text`] - Text normalization and keyword-context extraction
//! - [`corpus`] - Records, the corpus, and the two-phase corpus builder
//! - [`ngrams`] - N-gram extraction, stopword sets, frequency tables
//! - [`topics`] - Seams to an external embedding/clustering pipeline and
//!   merging its results back onto records
//! - [`persist`] - JSON-lines data, embeddings and run summaries on disk

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod corpus;
pub mod ngrams;
pub mod persist;
pub mod text;
pub mod topics;

// Re-export commonly used types
pub use corpus::{BuiltCorpus, Corpus, CorpusBuilder, CorpusError, DataSource, Record};
pub use ngrams::{NgramError, NgramExtractor, NgramSize, StopwordSet};
pub use persist::{PersistError, RunStamp};
pub use text::{ContextError, KeywordContextExtractor, TextNormalizer, clean_text};
pub use topics::{TopicError, TopicModel};
