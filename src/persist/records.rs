use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::corpus::{Corpus, Record};

use super::error::PersistError;
use super::stamp::RunStamp;

/// Reads a JSON-lines file into a corpus.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be read, or a
/// line-numbered error for the first malformed row.
#[instrument]
pub fn read_records(path: &Path) -> Result<Corpus, PersistError> {
    let file = File::open(path).map_err(|source| PersistError::io(path, source))?;
    let corpus = parse_records(BufReader::new(file)).map_err(|err| match err {
        PersistError::Io { source, .. } => PersistError::io(path, source),
        other => other,
    })?;
    info!(rows = corpus.len(), columns = corpus.columns().len(), "Loaded records");
    Ok(corpus)
}

/// Parses JSON lines, one object per line; blank lines are skipped.
///
/// # Errors
///
/// Returns [`PersistError::Json`] or [`PersistError::NotAnObject`] with the
/// 1-based line number of the first bad row.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Corpus, PersistError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| PersistError::io("<input>", source))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|source| PersistError::Json {
            line: line_no,
            source,
        })?;
        let Value::Object(fields) = value else {
            return Err(PersistError::NotAnObject { line: line_no });
        };
        records.push(Record::from(fields));
    }
    Ok(Corpus::new(records))
}

/// Writes `corpus` as JSON lines, creating parent directories.
///
/// # Errors
///
/// Returns [`PersistError`] on I/O or serialization failure.
#[instrument(skip(corpus), fields(rows = corpus.len()))]
pub fn write_records(path: &Path, corpus: &Corpus) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::io(parent, source))?;
    }
    let file = File::create(path).map_err(|source| PersistError::io(path, source))?;
    let mut writer = BufWriter::new(file);
    for record in corpus.records() {
        serde_json::to_writer(&mut writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|source| PersistError::io(path, source))?;
    }
    writer.flush().map_err(|source| PersistError::io(path, source))?;
    debug!(path = %path.display(), "Wrote records");
    Ok(())
}

/// Saves the corpus as `data_{stamp}.json` in `dir`.
///
/// # Errors
///
/// Returns [`PersistError`] if writing fails.
pub fn save_data(dir: &Path, stamp: &RunStamp, corpus: &Corpus) -> Result<PathBuf, PersistError> {
    let path = dir.join(stamp.data_file());
    write_records(&path, corpus)?;
    info!(path = %path.display(), rows = corpus.len(), "Saved data");
    Ok(path)
}
