use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, instrument};

use crate::topics::Embeddings;

use super::error::PersistError;
use super::stamp::RunStamp;

/// Saves embeddings as `embeddings_{stamp}.json`, one JSON array per row.
///
/// # Errors
///
/// Returns [`PersistError`] if writing fails.
#[instrument(skip(embeddings), fields(rows = embeddings.len()))]
pub fn save_embeddings(
    dir: &Path,
    stamp: &RunStamp,
    embeddings: &Embeddings,
) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir).map_err(|source| PersistError::io(dir, source))?;
    let path = dir.join(stamp.embeddings_file());
    let file = File::create(&path).map_err(|source| PersistError::io(&path, source))?;
    let mut writer = BufWriter::new(file);
    for row in embeddings {
        serde_json::to_writer(&mut writer, row)?;
        writer
            .write_all(b"\n")
            .map_err(|source| PersistError::io(&path, source))?;
    }
    writer.flush().map_err(|source| PersistError::io(&path, source))?;
    info!(path = %path.display(), "Saved embeddings");
    Ok(path)
}

/// Loads `embeddings_{stamp}.json` from `dir`.
///
/// Rows may be JSON arrays or objects keyed by column index
/// (`{"0": 0.1, "1": 0.2}`), the layout dataframe exports produce.
///
/// # Errors
///
/// Returns [`PersistError`] if the file is missing or a row is malformed.
#[instrument]
pub fn load_embeddings(dir: &Path, stamp: &RunStamp) -> Result<Embeddings, PersistError> {
    let path = dir.join(stamp.embeddings_file());
    let file = File::open(&path).map_err(|source| PersistError::io(&path, source))?;
    let mut embeddings = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| PersistError::io(&path, source))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|source| PersistError::Json {
            line: line_no,
            source,
        })?;
        embeddings.push(embedding_row(&value).ok_or(PersistError::EmbeddingRow { line: line_no })?);
    }
    Ok(embeddings)
}

#[allow(clippy::cast_possible_truncation)]
fn embedding_row(value: &Value) -> Option<Vec<f32>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_f64().map(|x| x as f32))
            .collect(),
        Value::Object(columns) => {
            let mut indexed: Vec<(usize, f32)> = columns
                .iter()
                .map(|(key, item)| Some((key.parse().ok()?, item.as_f64()? as f32)))
                .collect::<Option<_>>()?;
            indexed.sort_by_key(|(index, _)| *index);
            Some(indexed.into_iter().map(|(_, x)| x).collect())
        }
        _ => None,
    }
}
