//! Record and corpus types.
//!
//! A [`Record`] keeps its raw fields as a JSON object so any input schema can
//! be carried through unchanged. Values derived by topic modeling live in
//! typed slots ([`TopicEnrichment`], [`Projection`]) instead of being poked
//! into the field map; they are flattened back into the object on
//! serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the topic identifier (`-1` is the outlier topic).
pub const TOPIC_FIELD: &str = "topic";
/// Field holding the topic assignment probability.
pub const PROBABILITY_FIELD: &str = "probability";
/// Field holding the human-readable topic name.
pub const TOPIC_NAME_FIELD: &str = "topic_name";
/// Field holding the topic's representative words as `[word, weight]` pairs.
pub const TOPIC_WORDS_FIELD: &str = "tf_idf_words";
/// First 2-D projection coordinate.
pub const DIM0_FIELD: &str = "dim0";
/// Second 2-D projection coordinate.
pub const DIM1_FIELD: &str = "dim1";

/// A representative word of a topic with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64)", into = "(String, f64)")]
pub struct TopicWord {
    pub word: String,
    pub weight: f64,
}

impl From<(String, f64)> for TopicWord {
    fn from((word, weight): (String, f64)) -> Self {
        Self { word, weight }
    }
}

impl From<TopicWord> for (String, f64) {
    fn from(word: TopicWord) -> Self {
        (word.word, word.weight)
    }
}

/// Topic information merged onto a record after clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicEnrichment {
    pub topic: i64,
    pub probability: f64,
    pub topic_name: Option<String>,
    pub topic_words: Vec<TopicWord>,
}

impl TopicEnrichment {
    /// Creates an enrichment with only the assignment filled in.
    #[must_use]
    pub fn new(topic: i64, probability: f64) -> Self {
        Self {
            topic,
            probability,
            topic_name: None,
            topic_words: Vec::new(),
        }
    }
}

/// 2-D coordinates of a record's embedding, for scatter plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub dim0: f64,
    pub dim1: f64,
}

/// One input document.
///
/// A missing key and an explicit JSON `null` are both treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Record {
    fields: Map<String, Value>,
    topic: Option<TopicEnrichment>,
    projection: Option<Projection>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record with `field` set to `value`.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Raw fields of the record.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Raw value of `field`, `None` when absent or null.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    /// String value of `field`, `None` when absent, null, or not a string.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns `true` when `field` is absent or null.
    #[must_use]
    pub fn is_missing(&self, field: &str) -> bool {
        self.get(field).is_none()
    }

    /// Topic assignment, if the record has been enriched.
    #[must_use]
    pub fn topic(&self) -> Option<&TopicEnrichment> {
        self.topic.as_ref()
    }

    /// 2-D projection, if computed.
    #[must_use]
    pub fn projection(&self) -> Option<Projection> {
        self.projection
    }

    pub(crate) fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub(crate) fn set_topic(&mut self, topic: TopicEnrichment) {
        self.topic = Some(topic);
    }

    pub(crate) fn topic_mut(&mut self) -> Option<&mut TopicEnrichment> {
        self.topic.as_mut()
    }

    pub(crate) fn set_projection(&mut self, projection: Projection) {
        self.projection = Some(projection);
    }
}

impl From<Map<String, Value>> for Record {
    fn from(mut fields: Map<String, Value>) -> Self {
        let topic = take_topic(&mut fields);
        let projection = take_projection(&mut fields);
        Self {
            fields,
            topic,
            projection,
        }
    }
}

impl From<Record> for Map<String, Value> {
    fn from(record: Record) -> Self {
        let mut fields = record.fields;
        if let Some(topic) = record.topic {
            fields.insert(TOPIC_FIELD.to_string(), Value::from(topic.topic));
            fields.insert(PROBABILITY_FIELD.to_string(), Value::from(topic.probability));
            if let Some(name) = topic.topic_name {
                fields.insert(TOPIC_NAME_FIELD.to_string(), Value::from(name));
            }
            if !topic.topic_words.is_empty() {
                let words = topic
                    .topic_words
                    .into_iter()
                    .map(|word| serde_json::json!([word.word, word.weight]))
                    .collect();
                fields.insert(TOPIC_WORDS_FIELD.to_string(), Value::Array(words));
            }
        }
        if let Some(projection) = record.projection {
            fields.insert(DIM0_FIELD.to_string(), Value::from(projection.dim0));
            fields.insert(DIM1_FIELD.to_string(), Value::from(projection.dim1));
        }
        fields
    }
}

fn take_topic(fields: &mut Map<String, Value>) -> Option<TopicEnrichment> {
    let topic = fields.get(TOPIC_FIELD).and_then(Value::as_i64)?;
    let probability = fields.get(PROBABILITY_FIELD).and_then(Value::as_f64)?;
    fields.remove(TOPIC_FIELD);
    fields.remove(PROBABILITY_FIELD);

    let topic_name = match fields.get(TOPIC_NAME_FIELD) {
        Some(Value::String(_)) => fields
            .remove(TOPIC_NAME_FIELD)
            .and_then(|value| value.as_str().map(String::from)),
        _ => None,
    };

    let topic_words = match fields.get(TOPIC_WORDS_FIELD).map(parse_topic_words) {
        Some(Some(words)) => {
            fields.remove(TOPIC_WORDS_FIELD);
            words
        }
        _ => Vec::new(),
    };

    Some(TopicEnrichment {
        topic,
        probability,
        topic_name,
        topic_words,
    })
}

fn parse_topic_words(value: &Value) -> Option<Vec<TopicWord>> {
    value
        .as_array()?
        .iter()
        .map(|pair| serde_json::from_value::<TopicWord>(pair.clone()).ok())
        .collect()
}

fn take_projection(fields: &mut Map<String, Value>) -> Option<Projection> {
    let dim0 = fields.get(DIM0_FIELD).and_then(Value::as_f64)?;
    let dim1 = fields.get(DIM1_FIELD).and_then(Value::as_f64)?;
    fields.remove(DIM0_FIELD);
    fields.remove(DIM1_FIELD);
    Some(Projection { dim0, dim1 })
}

/// Ordered collection of records sharing a column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Corpus {
    /// Builds a corpus whose columns are the union of the records' keys, in
    /// first-seen order.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_columns(Vec::new(), records)
    }

    /// Builds a corpus with declared `columns`, extended by any extra keys
    /// found in the records.
    ///
    /// Declaring columns lets a schema contain a field that every record
    /// leaves null.
    #[must_use]
    pub fn with_columns(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut corpus = Self {
            columns: Vec::new(),
            records: Vec::new(),
        };
        for column in columns {
            corpus.add_column(&column);
        }
        for record in &records {
            for key in record.fields().keys() {
                corpus.add_column(key);
            }
        }
        corpus.records = records;
        corpus
    }

    /// Column names in schema order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if `column` is part of the schema.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|existing| existing == column)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the corpus has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the corpus, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub(crate) fn take_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    pub(crate) fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub(crate) fn add_column(&mut self, column: &str) {
        if !self.has_column(column) {
            self.columns.push(column.to_string());
        }
    }
}

impl FromIterator<Record> for Corpus {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
