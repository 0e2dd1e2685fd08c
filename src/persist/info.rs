use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::corpus::{Corpus, KEYWORD_FIELD};
use crate::topics::Embeddings;

use super::embeddings::load_embeddings;
use super::error::PersistError;
use super::records::read_records;
use super::stamp::RunStamp;

/// Field holding the subreddit a post came from.
pub const SUBREDDIT_FIELD: &str = "subreddit";
/// Field holding the post creation time.
pub const CREATED_FIELD: &str = "created_utc";

/// Human-readable summary of a run's data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelInfo {
    /// Distinct keywords in first-seen order; `None` without a keyword column.
    pub keywords: Option<Vec<String>>,
    /// Distinct subreddits in first-seen order.
    pub subreddits: Option<Vec<String>>,
    /// Distinct topic names, sorted.
    pub topics: Vec<String>,
    /// Earliest and latest creation date.
    pub dates: Option<(NaiveDate, NaiveDate)>,
}

impl ModelInfo {
    #[must_use]
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let topics: BTreeSet<String> = corpus
            .records()
            .iter()
            .filter_map(|record| record.topic()?.topic_name.clone())
            .collect();

        let dates = corpus
            .records()
            .iter()
            .filter_map(|record| record.get(CREATED_FIELD).and_then(parse_date))
            .fold(None, |range: Option<(NaiveDate, NaiveDate)>, date| {
                Some(match range {
                    Some((min, max)) => (min.min(date), max.max(date)),
                    None => (date, date),
                })
            });

        Self {
            keywords: unique_values(corpus, KEYWORD_FIELD),
            subreddits: unique_values(corpus, SUBREDDIT_FIELD),
            topics: topics.into_iter().collect(),
            dates,
        }
    }
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, values) in [("KEYWORD", &self.keywords), ("SUBREDDIT", &self.subreddits)] {
            if let Some(values) = values {
                writeln!(f, "{label}: {}", values.join(","))?;
                writeln!(f)?;
            }
        }

        writeln!(f, "TOPICS:")?;
        for topic in &self.topics {
            writeln!(f, "{topic}")?;
        }
        writeln!(f)?;

        if let Some((min, max)) = self.dates {
            writeln!(f, "DATES: {} to {}", min.format("%Y-%m-%d"), max.format("%Y-%m-%d"))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn unique_values(corpus: &Corpus, column: &str) -> Option<Vec<String>> {
    if !corpus.has_column(column) {
        return None;
    }
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    for value in corpus.records().iter().filter_map(|record| record.get(column)) {
        let text = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        if seen.insert(text.clone()) {
            values.push(text);
        }
    }
    Some(values)
}

/// Reads a creation time given as epoch seconds (number or numeric string),
/// RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
#[allow(clippy::cast_possible_truncation)]
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let from_epoch = |seconds: f64| {
        DateTime::from_timestamp(seconds.trunc() as i64, 0).map(|at| at.date_naive())
    };
    match value {
        Value::Number(number) => from_epoch(number.as_f64()?),
        Value::String(text) => {
            let text = text.trim();
            if let Ok(seconds) = text.parse::<f64>() {
                return from_epoch(seconds);
            }
            DateTime::parse_from_rfc3339(text)
                .map(|at| at.date_naive())
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|at| at.date())
                })
                .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
                .ok()
        }
        _ => None,
    }
}

/// Writes the run summary to `INFO_{stamp}.txt` in `dir`.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be written.
#[instrument(skip(corpus), fields(rows = corpus.len()))]
pub fn write_model_info(
    dir: &Path,
    stamp: &RunStamp,
    corpus: &Corpus,
) -> Result<PathBuf, PersistError> {
    let info = ModelInfo::from_corpus(corpus);
    let text = info.to_string();

    fs::create_dir_all(dir).map_err(|source| PersistError::io(dir, source))?;
    let path = dir.join(stamp.info_file());
    fs::write(&path, text).map_err(|source| PersistError::io(&path, source))?;
    info!(path = %path.display(), topics = info.topics.len(), "Wrote model info");
    Ok(path)
}

/// Artifacts of an earlier run.
#[derive(Debug, Clone)]
pub struct SavedRun {
    pub stamp: RunStamp,
    pub corpus: Corpus,
    /// `None` when the run saved no embeddings.
    pub embeddings: Option<Embeddings>,
}

/// Loads the data and, if present, the embeddings saved under `stamp`.
///
/// # Errors
///
/// Returns [`PersistError`] if the data file is missing or malformed, or the
/// embeddings file exists but is malformed.
#[instrument]
pub fn load_saved_run(dir: &Path, stamp: &RunStamp) -> Result<SavedRun, PersistError> {
    let corpus = read_records(&dir.join(stamp.data_file()))?;
    let embeddings = match load_embeddings(dir, stamp) {
        Ok(embeddings) => Some(embeddings),
        Err(PersistError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            debug!("No embeddings saved for this run");
            None
        }
        Err(err) => return Err(err),
    };
    Ok(SavedRun {
        stamp: stamp.clone(),
        corpus,
        embeddings,
    })
}
