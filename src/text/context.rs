//! Trimming long posts down to the sentences around a keyword.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::{instrument, trace};

/// Separator between alternative terms in a keyword expression.
pub const KEYWORD_ALTERNATION: char = '+';

/// Errors raised while building a keyword matcher.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The compiled alternation was rejected by the regex engine (size limits).
    #[error("cannot compile keyword expression '{expression}': {source}")]
    Pattern {
        /// The rejected expression.
        expression: String,
        /// Regex engine error.
        #[source]
        source: regex::Error,
    },
}

/// Keeps only the sentences that mention a keyword, plus their neighbors.
///
/// Sentences are the segments between literal periods. A keyword
/// expression like `wellness goal` is matched as a phrase, while
/// `wellness+goal` matches either term. Matching is case-insensitive.
///
/// # Example
///
/// ```
/// use topic_modeler_core::text::KeywordContextExtractor;
///
/// let extractor = KeywordContextExtractor::new("keyword").unwrap();
/// let trimmed = extractor.extract("A keyword here. B. keyword again. C. D. E.");
/// assert_eq!(trimmed, "A keyword here. B. keyword again. C");
/// ```
#[derive(Debug, Clone)]
pub struct KeywordContextExtractor {
    pattern: Regex,
}

impl KeywordContextExtractor {
    /// Compiles `keyword_expression` into a case-insensitive matcher.
    ///
    /// Each `+`-separated term is matched literally. An empty term matches
    /// every sentence, so `""`, `"+"` and `"wellness+"` keep the whole text.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Pattern`] if the alternation exceeds the regex
    /// engine's size limits.
    pub fn new(keyword_expression: &str) -> Result<Self, ContextError> {
        let alternatives: Vec<String> = keyword_expression
            .split(KEYWORD_ALTERNATION)
            .map(regex::escape)
            .collect();

        let pattern = RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
            .map_err(|source| ContextError::Pattern {
                expression: keyword_expression.to_string(),
                source,
            })?;

        Ok(Self { pattern })
    }

    /// Returns the matching sentences and their immediate neighbors.
    ///
    /// Windows are emitted in the order matches are found; a sentence already
    /// emitted (compared by content) is not repeated. No match yields an
    /// empty string.
    #[must_use]
    pub fn extract(&self, text: &str) -> String {
        let sentences: Vec<&str> = text.split('.').collect();
        let last = sentences.len() - 1;

        let mut window = Vec::new();
        for (index, sentence) in sentences.iter().enumerate() {
            if !self.pattern.is_match(sentence) {
                continue;
            }
            trace!(index, "keyword found in sentence");
            if index > 0 {
                window.push(sentences[index - 1]);
            }
            window.push(sentences[index]);
            if index != last {
                window.push(sentences[index + 1]);
            }
        }

        let mut seen = HashSet::new();
        window.retain(|sentence| seen.insert(*sentence));
        window.join(".")
    }
}

/// Builds a one-off extractor for `keyword_expression` and applies it to `text`.
///
/// For many documents sharing a keyword, create a [`KeywordContextExtractor`]
/// once instead.
///
/// # Errors
///
/// Returns [`ContextError`] if the keyword expression is unusable.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn sentences_around_keyword(
    text: &str,
    keyword_expression: &str,
) -> Result<String, ContextError> {
    Ok(KeywordContextExtractor::new(keyword_expression)?.extract(text))
}
