//! N-gram extraction with stopword filtering.
//!
//! The extractor produces one flattened blob of space-separated tokens per
//! run. Multi-word n-grams are joined with underscores (`wellness_goal`).
//! For n > 1 a window touching a stopword is dropped as a whole rather than
//! shortened, so a large stopword list can leave few n-grams behind.

mod error;
mod frequency;
mod size;
mod stopwords;

pub use error::NgramError;
pub use frequency::{NgramCount, NgramFrequencies, count_ngrams};
pub use size::{CoercedSize, NgramSize};
pub use stopwords::{StopwordSet, load_custom_stopwords};

use tracing::{debug, info, instrument};

use crate::corpus::BuiltCorpus;

/// Separator between the words of one n-gram token.
pub const NGRAM_JOINER: &str = "_";

/// Builds n-gram blobs from cleaned documents.
///
/// # Example
///
/// ```
/// use topic_modeler_core::ngrams::{NgramExtractor, NgramSize, StopwordSet};
///
/// let extractor = NgramExtractor::new(NgramSize::new(2).unwrap(), StopwordSet::from_words(["the"]));
/// let blob = extractor.run_documents(["set a wellness goal", "run the race"]);
/// assert_eq!(blob, "set_a a_wellness wellness_goal  ");
/// ```
#[derive(Debug, Clone)]
pub struct NgramExtractor {
    size: NgramSize,
    stopwords: StopwordSet,
}

impl NgramExtractor {
    /// Creates an extractor for `size`-grams that skips `stopwords`.
    #[must_use]
    pub fn new(size: NgramSize, stopwords: StopwordSet) -> Self {
        Self { size, stopwords }
    }

    /// Configured n.
    #[must_use]
    pub fn size(&self) -> NgramSize {
        self.size
    }

    /// Extracts n-grams from the corpus' modeling texts.
    #[must_use]
    #[instrument(skip(self, corpus), fields(n = self.size.get(), documents = corpus.len()))]
    pub fn run(&self, corpus: &BuiltCorpus) -> String {
        let blob = self.run_documents(corpus.documents());
        info!(blob_len = blob.len(), "N-gram extraction complete");
        blob
    }

    /// Extracts n-grams from arbitrary documents.
    ///
    /// Each document contributes its tokens joined by spaces followed by one
    /// trailing space, even when no token survives.
    #[must_use]
    pub fn run_documents<'a, I>(&self, documents: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut blob = String::new();
        for document in documents {
            let tokens = self.document_ngrams(document);
            blob.push_str(&tokens.join(" "));
            blob.push(' ');
        }
        blob
    }

    /// N-gram tokens of a single document, in order.
    #[must_use]
    pub fn document_ngrams(&self, document: &str) -> Vec<String> {
        let words: Vec<String> = document.split_whitespace().map(str::to_lowercase).collect();

        if self.size.is_unigram() {
            return words
                .into_iter()
                .filter(|word| !self.stopwords.contains(word))
                .collect();
        }

        let n = self.size.get();
        let mut ngrams = Vec::new();
        let mut rejected = 0_usize;
        for window in words.windows(n) {
            if window.iter().any(|word| self.rejects(word)) {
                rejected += 1;
                continue;
            }
            ngrams.push(window.join(NGRAM_JOINER));
        }
        if rejected > 0 {
            debug!(rejected, "Dropped windows containing stopwords");
        }
        ngrams
    }

    fn rejects(&self, word: &str) -> bool {
        word.trim().is_empty() || self.stopwords.contains(word)
    }
}
