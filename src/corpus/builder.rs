//! Two-phase corpus construction: `transform` then `clean`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::text::{KeywordContextExtractor, TextNormalizer};

use super::error::CorpusError;
use super::record::{Corpus, Record};

/// Suffix of the column that keeps the text as it was before any change.
pub const ORIGINAL_SUFFIX: &str = "_original";
/// Suffix of the column that holds the cleaned modeling text.
pub const CLEAN_SUFFIX: &str = "_clean";
/// Optional column prepended to the text.
pub const TITLE_FIELD: &str = "title";
/// Per-record keyword expression used by keyword-trimmed sources.
pub const KEYWORD_FIELD: &str = "keyword";

/// Where the records come from.
///
/// Reddit posts are long and were collected around a keyword, so their text
/// is trimmed to the sentences surrounding that keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Reddit submissions or comments; trimmed to keyword context.
    Reddit,
    /// Any other source; text is used as-is.
    #[default]
    Other,
}

impl DataSource {
    /// Returns `true` if records are trimmed to the sentences around their keyword.
    #[must_use]
    pub fn trims_to_keyword_context(self) -> bool {
        matches!(self, Self::Reddit)
    }

    /// Stable label for logs and config output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reddit => "reddit",
            Self::Other => "other",
        }
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("reddit") {
            Ok(Self::Reddit)
        } else {
            Ok(Self::Other)
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of a [`CorpusBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Schema checked, records untouched.
    Loaded,
    /// Text trimmed, titled and original text kept.
    Transformed,
    /// Modeling column written, duplicates and empties dropped.
    Cleaned,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Loaded => "loaded",
            Self::Transformed => "transformed",
            Self::Cleaned => "cleaned",
        };
        f.write_str(label)
    }
}

/// Owns a corpus while it is transformed and cleaned.
///
/// Phases consume the builder, so a failing phase leaves nothing behind.
///
/// # Example
///
/// ```
/// use topic_modeler_core::corpus::{Corpus, CorpusBuilder, DataSource, Record};
///
/// let corpus = Corpus::new(vec![
///     Record::new().with_field("body", "Hello, World!"),
///     Record::new().with_field("body", "hello world!"),
/// ]);
/// let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();
/// assert_eq!(built.documents(), vec!["hello, world!", "hello world!"]);
/// ```
#[derive(Debug)]
pub struct CorpusBuilder {
    corpus: Corpus,
    text_column: String,
    original_column: String,
    modeling_column: String,
    data_source: DataSource,
    phase: BuildPhase,
}

impl CorpusBuilder {
    /// Validates the schema and takes ownership of `corpus`.
    ///
    /// An empty corpus is accepted without validation; both phases are then
    /// no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::MissingColumn`] if `text_column` is absent, or
    /// if the source trims to keyword context and there is no keyword column.
    #[instrument(skip(corpus), fields(rows = corpus.len()))]
    pub fn new(
        corpus: Corpus,
        text_column: &str,
        data_source: DataSource,
    ) -> Result<Self, CorpusError> {
        if !corpus.is_empty() {
            if !corpus.has_column(text_column) {
                return Err(CorpusError::missing_column(text_column, corpus.columns()));
            }
            if data_source.trims_to_keyword_context() && !corpus.has_column(KEYWORD_FIELD) {
                return Err(CorpusError::missing_column(KEYWORD_FIELD, corpus.columns()));
            }
        }

        Ok(Self {
            corpus,
            text_column: text_column.to_string(),
            original_column: format!("{text_column}{ORIGINAL_SUFFIX}"),
            modeling_column: format!("{text_column}{CLEAN_SUFFIX}"),
            data_source,
            phase: BuildPhase::Loaded,
        })
    }

    /// Runs every phase and returns the finished corpus.
    ///
    /// # Errors
    ///
    /// Returns the first [`CorpusError`] raised by any phase.
    pub fn build(
        corpus: Corpus,
        text_column: &str,
        data_source: DataSource,
    ) -> Result<BuiltCorpus, CorpusError> {
        Self::new(corpus, text_column, data_source)?
            .transform()?
            .clean()?
            .finish()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Corpus in its current state.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Drops records without text, keeps a copy of the original text, trims
    /// to keyword context when the source asks for it and prepends titles.
    ///
    /// # Errors
    ///
    /// - [`CorpusError::PhaseOrder`] if already transformed
    /// - [`CorpusError::NonTextValue`] if a text field is not a string
    #[instrument(skip(self), fields(column = %self.text_column, source = %self.data_source))]
    pub fn transform(mut self) -> Result<Self, CorpusError> {
        self.expect_phase(BuildPhase::Loaded, "transform")?;
        if self.corpus.is_empty() {
            debug!("Empty corpus, nothing to transform");
            self.phase = BuildPhase::Transformed;
            return Ok(self);
        }

        let records = self.corpus.take_records();
        let initial = records.len();
        info!(rows = initial, "Initial dataset size");

        let present: Vec<(usize, Record)> = records
            .into_iter()
            .enumerate()
            .filter(|(_, record)| !record.is_missing(&self.text_column))
            .collect();
        info!(
            rows = present.len(),
            removed = initial - present.len(),
            "Removed records with missing text"
        );

        let trims = self.data_source.trims_to_keyword_context();
        let has_title = self.corpus.has_column(TITLE_FIELD);
        let mut extractors: HashMap<String, Option<KeywordContextExtractor>> = HashMap::new();
        let mut transformed = Vec::with_capacity(present.len());

        for (row, mut record) in present {
            let mut text = match record.get(&self.text_column) {
                Some(Value::String(text)) => text.clone(),
                Some(other) => {
                    return Err(CorpusError::NonTextValue {
                        row,
                        column: self.text_column.clone(),
                        value: other.to_string(),
                    });
                }
                None => continue,
            };
            record.set(self.original_column.clone(), text.clone());

            if trims {
                if let Some(keyword) = record.text(KEYWORD_FIELD) {
                    let extractor = match extractors.entry(keyword.to_string()) {
                        Entry::Occupied(entry) => entry.into_mut(),
                        Entry::Vacant(entry) => entry.insert(
                            KeywordContextExtractor::new(keyword)
                                .inspect_err(|err| {
                                    warn!(row, error = %err, "Unusable keyword, keeping full text");
                                })
                                .ok(),
                        ),
                    };
                    if let Some(extractor) = extractor {
                        text = extractor.extract(&text);
                    }
                } else {
                    debug!(row, "No keyword on record, keeping full text");
                }
            }

            if has_title && let Some(title) = record.text(TITLE_FIELD) {
                text = format!("{title}.{text}");
            }

            record.set(self.text_column.clone(), text);
            transformed.push(record);
        }

        if trims {
            info!(keywords = extractors.len(), "Text shortened to sentences around keyword");
        }

        self.corpus.replace_records(transformed);
        let original_column = self.original_column.clone();
        self.corpus.add_column(&original_column);
        self.phase = BuildPhase::Transformed;
        Ok(self)
    }

    /// Writes the normalized text to the modeling column, then drops
    /// duplicate and empty results.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::PhaseOrder`] unless the corpus was transformed.
    #[instrument(skip(self), fields(column = %self.modeling_column))]
    pub fn clean(mut self) -> Result<Self, CorpusError> {
        self.expect_phase(BuildPhase::Transformed, "clean")?;
        if self.corpus.is_empty() {
            debug!("Empty corpus, nothing to clean");
            self.phase = BuildPhase::Cleaned;
            return Ok(self);
        }

        let normalizer = TextNormalizer::new();
        let records = self.corpus.take_records();
        let mut seen = HashSet::new();
        let mut duplicates = 0_usize;
        let mut empties = 0_usize;
        let mut cleaned = Vec::with_capacity(records.len());

        for mut record in records {
            let modeling = record
                .text(&self.text_column)
                .map(|text| normalizer.clean(text))
                .unwrap_or_default();

            if !seen.insert(modeling.clone()) {
                duplicates += 1;
                continue;
            }
            if modeling.is_empty() {
                empties += 1;
                continue;
            }

            record.set(self.modeling_column.clone(), modeling);
            cleaned.push(record);
        }

        debug!(duplicates, empties, "Dropped duplicate and empty documents");
        info!(rows = cleaned.len(), "Data after cleaning");

        self.corpus.replace_records(cleaned);
        let modeling_column = self.modeling_column.clone();
        self.corpus.add_column(&modeling_column);
        self.phase = BuildPhase::Cleaned;
        Ok(self)
    }

    /// Hands out the finished corpus.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::PhaseOrder`] unless the corpus was cleaned.
    pub fn finish(self) -> Result<BuiltCorpus, CorpusError> {
        self.expect_phase(BuildPhase::Cleaned, "finish")?;
        Ok(BuiltCorpus {
            corpus: self.corpus,
            text_column: self.text_column,
            original_column: self.original_column,
            modeling_column: self.modeling_column,
        })
    }

    fn expect_phase(&self, expected: BuildPhase, requested: &'static str) -> Result<(), CorpusError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CorpusError::PhaseOrder {
                current: self.phase,
                requested,
            })
        }
    }
}

/// A cleaned corpus, ready for n-grams or topic modeling.
///
/// Every record carries a non-empty modeling text, unique across the corpus.
#[derive(Debug, Clone)]
pub struct BuiltCorpus {
    corpus: Corpus,
    text_column: String,
    original_column: String,
    modeling_column: String,
}

impl BuiltCorpus {
    /// Modeling texts in record order, ready for embedding.
    #[must_use]
    pub fn documents(&self) -> Vec<&str> {
        self.corpus
            .records()
            .iter()
            .filter_map(|record| record.text(&self.modeling_column))
            .collect()
    }

    /// Underlying corpus.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Mutable access for merging topic results back onto the records.
    pub fn corpus_mut(&mut self) -> &mut Corpus {
        &mut self.corpus
    }

    /// Consumes the built corpus.
    #[must_use]
    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }

    /// Column the corpus was built from.
    #[must_use]
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// Column holding the untouched input text.
    #[must_use]
    pub fn original_column(&self) -> &str {
        &self.original_column
    }

    /// Column holding the cleaned modeling text.
    #[must_use]
    pub fn modeling_column(&self) -> &str {
        &self.modeling_column
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    /// Returns `true` when cleaning left no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(text: &str) -> Record {
        Record::new().with_field("body", text)
    }

    fn reddit_post(title: &str, text: &str, keyword: &str) -> Record {
        Record::new()
            .with_field("title", title)
            .with_field("body", text)
            .with_field("keyword", keyword)
    }

    #[test]
    fn test_new_rejects_missing_text_column() {
        let corpus = Corpus::new(vec![body("hello")]);
        let err = CorpusBuilder::new(corpus, "selftext", DataSource::Other).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn { ref column, .. } if column == "selftext"));
    }

    #[test]
    fn test_new_reddit_requires_keyword_column() {
        let corpus = Corpus::new(vec![body("hello")]);
        let err = CorpusBuilder::new(corpus, "body", DataSource::Reddit).unwrap_err();
        assert!(matches!(err, CorpusError::MissingColumn { ref column, .. } if column == "keyword"));
    }

    #[test]
    fn test_empty_corpus_is_a_no_op() {
        let built = CorpusBuilder::build(Corpus::default(), "missing", DataSource::Reddit).unwrap();
        assert!(built.is_empty());
        assert!(built.documents().is_empty());
        assert_eq!(built.modeling_column(), "missing_clean");
    }

    #[test]
    fn test_transform_drops_missing_and_null_text() {
        let corpus = Corpus::new(vec![
            body("kept"),
            Record::new().with_field("body", Value::Null),
            Record::new().with_field("title", "no body"),
        ]);
        let builder = CorpusBuilder::new(corpus, "body", DataSource::Other)
            .unwrap()
            .transform()
            .unwrap();
        assert_eq!(builder.corpus().len(), 1);
        assert_eq!(builder.phase(), BuildPhase::Transformed);
    }

    #[test]
    fn test_transform_rejects_non_text_values() {
        let corpus = Corpus::new(vec![body("fine"), Record::new().with_field("body", json!(12))]);
        let err = CorpusBuilder::new(corpus, "body", DataSource::Other)
            .unwrap()
            .transform()
            .unwrap_err();
        assert!(matches!(err, CorpusError::NonTextValue { row: 1, .. }));
    }

    #[test]
    fn test_transform_keeps_original_and_prepends_title() {
        let corpus = Corpus::new(vec![
            Record::new().with_field("title", "My Title").with_field("body", "Body text"),
            Record::new().with_field("title", Value::Null).with_field("body", "Untitled"),
        ]);
        let builder = CorpusBuilder::new(corpus, "body", DataSource::Other)
            .unwrap()
            .transform()
            .unwrap();
        let records = builder.corpus().records();

        assert_eq!(records[0].text("body"), Some("My Title.Body text"));
        assert_eq!(records[0].text("body_original"), Some("Body text"));
        assert_eq!(records[1].text("body"), Some("Untitled"));
        assert!(builder.corpus().has_column("body_original"));
    }

    #[test]
    fn test_transform_reddit_trims_to_keyword_context() {
        let corpus = Corpus::new(vec![reddit_post(
            "My Journey",
            "I set a wellness goal. It was hard. I met it eventually.",
            "wellness goal",
        )]);
        let builder = CorpusBuilder::new(corpus, "body", DataSource::Reddit)
            .unwrap()
            .transform()
            .unwrap();
        let record = &builder.corpus().records()[0];

        assert_eq!(
            record.text("body"),
            Some("My Journey.I set a wellness goal. It was hard")
        );
        assert_eq!(
            record.text("body_original"),
            Some("I set a wellness goal. It was hard. I met it eventually.")
        );
    }

    #[test]
    fn test_transform_reddit_without_match_leaves_only_title() {
        let corpus = Corpus::new(vec![reddit_post("Title", "Nothing relevant.", "wellness")]);
        let built = CorpusBuilder::build(corpus, "body", DataSource::Reddit).unwrap();
        assert_eq!(built.documents(), vec!["title"]);
    }

    #[test]
    fn test_transform_reddit_record_without_keyword_keeps_text() {
        let corpus = Corpus::new(vec![
            reddit_post("T", "one. wellness two. three. four", "wellness"),
            Record::new().with_field("body", "Long. Untouched. Text").with_field("keyword", Value::Null),
        ]);
        let builder = CorpusBuilder::new(corpus, "body", DataSource::Reddit)
            .unwrap()
            .transform()
            .unwrap();
        let records = builder.corpus().records();
        assert_eq!(records[0].text("body"), Some("T.one. wellness two. three"));
        assert_eq!(records[1].text("body"), Some("Long. Untouched. Text"));
    }

    #[test]
    fn test_transform_reddit_empty_keyword_keeps_every_sentence() {
        let corpus = Corpus::new(vec![
            reddit_post("A", "one. wellness two. three. four", "wellness"),
            reddit_post("B", "one. two. three", ""),
            reddit_post("C", "first. second", "+"),
            reddit_post("D", "alpha. beta", "wellness+"),
        ]);
        let built = CorpusBuilder::build(corpus, "body", DataSource::Reddit).unwrap();
        assert_eq!(
            built.documents(),
            vec![
                "a one wellness two three",
                "b one two three",
                "c first second",
                "d alpha beta"
            ]
        );
    }

    #[test]
    fn test_clean_drops_duplicates_and_empties() {
        let corpus = Corpus::new(vec![
            body("Same Text!"),
            body("same   text!"),
            body("..."),
            body("Different text"),
        ]);
        let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();

        assert_eq!(built.documents(), vec!["same text!", "different text"]);
        assert_eq!(built.corpus().records()[0].text("body"), Some("Same Text!"));
    }

    #[test]
    fn test_clean_adds_modeling_column() {
        let built = CorpusBuilder::build(Corpus::new(vec![body("A")]), "body", DataSource::Other)
            .unwrap();
        assert_eq!(built.modeling_column(), "body_clean");
        assert_eq!(built.original_column(), "body_original");
        assert_eq!(built.text_column(), "body");
        assert_eq!(built.corpus().columns(), ["body", "body_original", "body_clean"]);
    }

    #[test]
    fn test_clean_everything_empty_yields_empty_corpus() {
        let corpus = Corpus::new(vec![body("..."), body("   "), body("http://only.link")]);
        let built = CorpusBuilder::build(corpus, "body", DataSource::Other).unwrap();
        assert!(built.is_empty());
        assert_eq!(built.len(), 0);
    }

    #[test]
    fn test_phases_out_of_order_are_rejected() {
        let builder = CorpusBuilder::new(Corpus::new(vec![body("x")]), "body", DataSource::Other)
            .unwrap();
        let err = builder.clean().unwrap_err();
        assert!(matches!(
            err,
            CorpusError::PhaseOrder {
                current: BuildPhase::Loaded,
                requested: "clean"
            }
        ));

        let transformed = CorpusBuilder::new(Corpus::new(vec![body("x")]), "body", DataSource::Other)
            .unwrap()
            .transform()
            .unwrap();
        assert!(matches!(
            transformed.finish(),
            Err(CorpusError::PhaseOrder { requested: "finish", .. })
        ));
    }

    #[test]
    fn test_transform_twice_is_rejected() {
        let err = CorpusBuilder::new(Corpus::new(vec![body("x")]), "body", DataSource::Other)
            .unwrap()
            .transform()
            .unwrap()
            .transform()
            .unwrap_err();
        assert!(matches!(err, CorpusError::PhaseOrder { requested: "transform", .. }));
    }

    #[test]
    fn test_data_source_parsing() {
        assert_eq!("reddit".parse::<DataSource>().unwrap(), DataSource::Reddit);
        assert_eq!(" Reddit ".parse::<DataSource>().unwrap(), DataSource::Reddit);
        assert_eq!("twitter".parse::<DataSource>().unwrap(), DataSource::Other);
        assert_eq!(DataSource::Reddit.to_string(), "reddit");
        assert!(DataSource::Reddit.trims_to_keyword_context());
        assert!(!DataSource::Other.trims_to_keyword_context());
    }
}
