//! Enrich command: merge external topic results and save the run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use topic_modeler_core::persist::{RunStamp, save_data, write_model_info};
use topic_modeler_core::topics::{ExternalTopicRow, merge_external_rows};
use tracing::info;

use crate::app_config::Effective;
use crate::cli::CorpusArgs;

use super::build_corpus;

pub fn run_enrich_command(args: &CorpusArgs, topics: &Path, effective: &Effective) -> Result<()> {
    let mut built = build_corpus(args, effective)?;
    let rows = read_topic_rows(topics)?;

    merge_external_rows(built.corpus_mut(), &rows)
        .with_context(|| format!("Failed to merge topics from '{}'", topics.display()))?;

    let stamp = RunStamp::now();
    let dir = args.output_dir.as_ref().unwrap_or(&effective.output_dir);
    let data_path = save_data(dir, &stamp, built.corpus())?;
    let info_path = write_model_info(dir, &stamp, built.corpus())?;

    info!(stamp = %stamp, documents = built.len(), "Run saved");
    println!("{}", data_path.display());
    println!("{}", info_path.display());
    Ok(())
}

fn read_topic_rows(path: &Path) -> Result<Vec<ExternalTopicRow>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read topics file '{}'", path.display()))?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| {
                format!("Invalid topic row on line {} of '{}'", index + 1, path.display())
            })
        })
        .collect()
}
