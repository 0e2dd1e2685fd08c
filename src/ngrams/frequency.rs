//! Frequency tables over n-gram blobs, for bar charts and word clouds.

use std::collections::HashMap;

use serde::Serialize;

/// How often one n-gram token occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NgramCount {
    pub ngram: String,
    pub count: usize,
}

/// N-gram counts, most frequent first (ties broken alphabetically).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NgramFrequencies {
    counts: Vec<NgramCount>,
}

impl NgramFrequencies {
    /// The `k` most frequent n-grams.
    #[must_use]
    pub fn top(&self, k: usize) -> &[NgramCount] {
        &self.counts[..k.min(self.counts.len())]
    }

    /// Count for a single n-gram, zero if absent.
    #[must_use]
    pub fn count_of(&self, ngram: &str) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.ngram == ngram)
            .map_or(0, |entry| entry.count)
    }

    /// Number of distinct n-grams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when the blob held no n-grams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All counts in ranking order.
    pub fn iter(&self) -> impl Iterator<Item = &NgramCount> {
        self.counts.iter()
    }
}

/// Counts the space-separated tokens of an n-gram blob.
#[must_use]
pub fn count_ngrams(blob: &str) -> NgramFrequencies {
    let mut tally: HashMap<&str, usize> = HashMap::new();
    for token in blob.split_whitespace() {
        *tally.entry(token).or_default() += 1;
    }

    let mut counts: Vec<NgramCount> = tally
        .into_iter()
        .map(|(ngram, count)| NgramCount {
            ngram: ngram.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ngram.cmp(&b.ngram)));

    NgramFrequencies { counts }
}
