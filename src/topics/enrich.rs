//! Merging topic results back onto records, and the data handed to charts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::corpus::{Corpus, Projection, TITLE_FIELD, TopicEnrichment, TopicWord};

use super::error::TopicError;

/// Topic id used for documents that fit no cluster.
pub const OUTLIER_TOPIC: i64 = -1;
/// Field linking a record to its source page.
pub const URL_FIELD: &str = "url";

/// Topic assigned to one document, in corpus order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub topic: i64,
    pub probability: f64,
}

/// One row of the clusterer's topic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub topic: i64,
    pub name: String,
    #[serde(default)]
    pub count: usize,
}

/// Row produced by an external topic pipeline run, one per corpus record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExternalTopicRow {
    pub topic: i64,
    pub probability: f64,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub dim0: Option<f64>,
    #[serde(default)]
    pub dim1: Option<f64>,
}

/// Number of documents in a named topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic_name: String,
    pub count: usize,
}

/// One point of the cluster scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub topic: i64,
    pub topic_name: Option<String>,
    pub dim0: Option<f64>,
    pub dim1: Option<f64>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

fn ensure_same_length(what: &'static str, corpus: &Corpus, actual: usize) -> Result<(), TopicError> {
    if corpus.len() == actual {
        Ok(())
    } else {
        Err(TopicError::LengthMismatch {
            what,
            expected: corpus.len(),
            actual,
        })
    }
}

/// Sets `topic` and `probability` on every record, position by position.
///
/// # Errors
///
/// Returns [`TopicError::LengthMismatch`] (leaving the corpus untouched) if
/// there is not exactly one assignment per record.
#[instrument(skip(corpus, assignments), fields(records = corpus.len(), assignments = assignments.len()))]
pub fn merge_topic_assignments(
    corpus: &mut Corpus,
    assignments: &[TopicAssignment],
) -> Result<(), TopicError> {
    ensure_same_length("topic assignments", corpus, assignments.len())?;
    for (record, assignment) in corpus.records_mut().iter_mut().zip(assignments) {
        record.set_topic(TopicEnrichment::new(assignment.topic, assignment.probability));
    }
    Ok(())
}

/// Names every assigned topic from the clusterer's topic table.
///
/// # Errors
///
/// Returns [`TopicError::UnknownTopic`] (leaving the corpus untouched) if a
/// record's topic is missing from `info`.
pub fn apply_topic_names(corpus: &mut Corpus, info: &[TopicInfo]) -> Result<(), TopicError> {
    let names: HashMap<i64, &str> = info
        .iter()
        .map(|row| (row.topic, row.name.as_str()))
        .collect();

    if let Some(topic) = corpus
        .records()
        .iter()
        .filter_map(|record| record.topic().map(|t| t.topic))
        .find(|topic| !names.contains_key(topic))
    {
        return Err(TopicError::UnknownTopic { topic });
    }

    for record in corpus.records_mut() {
        if let Some(enrichment) = record.topic_mut()
            && let Some(name) = names.get(&enrichment.topic)
        {
            enrichment.topic_name = Some((*name).to_string());
        }
    }
    Ok(())
}

/// Attaches each topic's representative words to its records.
pub fn attach_topic_words<F>(corpus: &mut Corpus, mut words_for: F)
where
    F: FnMut(i64) -> Vec<TopicWord>,
{
    let mut cache: HashMap<i64, Vec<TopicWord>> = HashMap::new();
    for record in corpus.records_mut() {
        if let Some(enrichment) = record.topic_mut() {
            let words = cache
                .entry(enrichment.topic)
                .or_insert_with(|| words_for(enrichment.topic));
            enrichment.topic_words.clone_from(words);
        }
    }
}

/// Sets the 2-D projection on every record, position by position.
///
/// # Errors
///
/// Returns [`TopicError::LengthMismatch`] if there is not exactly one point
/// per record.
pub fn merge_projection(corpus: &mut Corpus, projections: &[Projection]) -> Result<(), TopicError> {
    ensure_same_length("projection", corpus, projections.len())?;
    for (record, projection) in corpus.records_mut().iter_mut().zip(projections) {
        record.set_projection(*projection);
    }
    Ok(())
}

/// Merges rows from an external pipeline run: assignments, names when given,
/// and coordinates when both are given.
///
/// # Errors
///
/// Returns [`TopicError::LengthMismatch`] if there is not exactly one row
/// per record.
#[instrument(skip(corpus, rows), fields(records = corpus.len(), rows = rows.len()))]
pub fn merge_external_rows(corpus: &mut Corpus, rows: &[ExternalTopicRow]) -> Result<(), TopicError> {
    ensure_same_length("topic rows", corpus, rows.len())?;
    let mut projected = 0_usize;
    for (record, row) in corpus.records_mut().iter_mut().zip(rows) {
        let mut enrichment = TopicEnrichment::new(row.topic, row.probability);
        enrichment.topic_name.clone_from(&row.topic_name);
        record.set_topic(enrichment);
        if let (Some(dim0), Some(dim1)) = (row.dim0, row.dim1) {
            record.set_projection(Projection { dim0, dim1 });
            projected += 1;
        }
    }
    debug!(projected, "Merged external topic rows");
    Ok(())
}

fn is_charted(topic: i64, limit_topics: i64) -> bool {
    topic != OUTLIER_TOPIC && topic < limit_topics
}

/// Documents per topic name, skipping outliers and topics at or beyond
/// `limit_topics`, most frequent first.
#[must_use]
pub fn topic_frequency(corpus: &Corpus, limit_topics: i64) -> Vec<TopicCount> {
    let mut tally: HashMap<String, usize> = HashMap::new();
    for enrichment in corpus.records().iter().filter_map(|record| record.topic()) {
        if !is_charted(enrichment.topic, limit_topics) {
            continue;
        }
        let name = enrichment
            .topic_name
            .clone()
            .unwrap_or_else(|| enrichment.topic.to_string());
        *tally.entry(name).or_default() += 1;
    }

    let mut counts: Vec<TopicCount> = tally
        .into_iter()
        .map(|(topic_name, count)| TopicCount { topic_name, count })
        .collect();
    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.topic_name.cmp(&b.topic_name))
    });
    counts
}

/// Scatter-plot rows for the charted topics, in corpus order.
///
/// `text_column` is shown as the post content.
#[must_use]
pub fn chart_rows(corpus: &Corpus, limit_topics: i64, text_column: &str) -> Vec<ChartRow> {
    corpus
        .records()
        .iter()
        .filter_map(|record| {
            let enrichment = record.topic()?;
            if !is_charted(enrichment.topic, limit_topics) {
                return None;
            }
            let projection = record.projection();
            Some(ChartRow {
                topic: enrichment.topic,
                topic_name: enrichment.topic_name.clone(),
                dim0: projection.map(|p| p.dim0),
                dim1: projection.map(|p| p.dim1),
                title: record.text(TITLE_FIELD).map(String::from),
                text: record.text(text_column).map(String::from),
                url: record.text(URL_FIELD).map(String::from),
            })
        })
        .collect()
}
