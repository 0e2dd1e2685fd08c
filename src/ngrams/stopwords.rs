//! Stopword sets injected into n-gram extraction.

use std::collections::HashSet;
use std::path::Path;

use stop_words::{LANGUAGE, get};
use tracing::{debug, instrument};

use super::error::NgramError;

/// Lowercase words excluded from n-grams.
///
/// Built once from an optional language list plus caller-supplied terms and
/// never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// A set that filters nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from arbitrary words, lowercasing them.
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    /// Loads the built-in list for `language` (e.g. `"english"`).
    ///
    /// # Errors
    ///
    /// Returns [`NgramError::StopwordsUnavailable`] if no list exists for the
    /// language.
    #[instrument]
    pub fn for_language(language: &str) -> Result<Self, NgramError> {
        let list = language_list(language).ok_or_else(|| NgramError::StopwordsUnavailable {
            language: language.to_string(),
        })?;
        let set = Self::from_words(get(list).into_iter().map(|word| word.to_string()));
        debug!(words = set.len(), "Loaded default stopwords");
        Ok(set)
    }

    /// Union of the `language` list (when given) and `custom` terms.
    ///
    /// # Errors
    ///
    /// Returns [`NgramError::StopwordsUnavailable`] if `language` has no list.
    pub fn build<I, S>(language: Option<&str>, custom: I) -> Result<Self, NgramError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = match language {
            Some(language) => Self::for_language(language)?,
            None => Self::empty(),
        };
        set.words.extend(Self::from_words(custom).words);
        Ok(set)
    }

    /// Returns `true` if `word` (already lowercase) is a stopword.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct stopwords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when nothing is filtered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn language_list(language: &str) -> Option<LANGUAGE> {
    match language.trim().to_lowercase().as_str() {
        "english" | "en" => Some(LANGUAGE::English),
        "french" | "fr" => Some(LANGUAGE::French),
        "german" | "de" => Some(LANGUAGE::German),
        "spanish" | "es" => Some(LANGUAGE::Spanish),
        "italian" | "it" => Some(LANGUAGE::Italian),
        "portuguese" | "pt" => Some(LANGUAGE::Portuguese),
        "dutch" | "nl" => Some(LANGUAGE::Dutch),
        _ => None,
    }
}

/// Loads custom stopwords from a file (one term per line).
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns [`NgramError::StopwordsFile`] if the file cannot be read.
#[instrument]
pub fn load_custom_stopwords(path: &Path) -> Result<Vec<String>, NgramError> {
    let content = std::fs::read_to_string(path).map_err(|source| NgramError::StopwordsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let words = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    Ok(words)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_english_list_contains_common_words() {
        let set = StopwordSet::for_language("english").unwrap();
        assert!(set.contains("the"));
        assert!(set.contains("and"));
        assert!(!set.contains("wellness"));
    }

    #[test]
    fn test_language_names_are_case_insensitive() {
        let set = StopwordSet::for_language("English").unwrap();
        assert!(!set.is_empty());
    }

    #[test]
    fn test_unknown_language_is_unavailable() {
        let err = StopwordSet::for_language("klingon").unwrap_err();
        assert!(matches!(err, NgramError::StopwordsUnavailable { ref language } if language == "klingon"));
    }

    #[test]
    fn test_from_words_lowercases_and_skips_blanks() {
        let set = StopwordSet::from_words(["The", "  AND ", ""]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("the"));
        assert!(set.contains("and"));
    }

    #[test]
    fn test_build_unions_language_and_custom() {
        let english = StopwordSet::for_language("english").unwrap();
        let set = StopwordSet::build(Some("english"), ["reddit", "Post"]).unwrap();
        assert!(set.contains("the"));
        assert!(set.contains("reddit"));
        assert!(set.contains("post"));
        assert!(set.len() >= english.len());
    }

    #[test]
    fn test_build_without_language_is_custom_only() {
        let set = StopwordSet::build(None, ["only"]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.contains("the"));
    }

    #[test]
    fn test_build_with_unknown_language_fails() {
        assert!(StopwordSet::build(Some("klingon"), ["x"]).is_err());
    }

    #[test]
    fn test_load_custom_stopwords_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# domain words").unwrap();
        writeln!(file, "reddit").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  subreddit  ").unwrap();

        let words = load_custom_stopwords(file.path()).unwrap();
        assert_eq!(words, vec!["reddit", "subreddit"]);
    }

    #[test]
    fn test_load_custom_stopwords_missing_file_errors() {
        let err = load_custom_stopwords(Path::new("/nonexistent/stopwords.txt")).unwrap_err();
        assert!(matches!(err, NgramError::StopwordsFile { .. }));
    }
}
