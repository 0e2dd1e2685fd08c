//! Corpus command: build and save the cleaned corpus.

use std::path::PathBuf;

use anyhow::{Context, Result};
use topic_modeler_core::corpus::{BuiltCorpus, CorpusBuilder, DataSource};
use topic_modeler_core::persist::{RunStamp, read_records, save_data, write_records};
use tracing::{debug, info};

use crate::app_config::Effective;
use crate::cli::CorpusArgs;

/// Reads `args.input` and runs both corpus phases, CLI flags taking
/// precedence over config values.
pub fn build_corpus(args: &CorpusArgs, effective: &Effective) -> Result<BuiltCorpus> {
    let text_column = args
        .text_column
        .clone()
        .unwrap_or_else(|| effective.text_column.clone());
    let source = args
        .source
        .as_deref()
        .map_or(effective.data_source, |source| {
            source.parse().unwrap_or(DataSource::Other)
        });
    debug!(%text_column, source = %source, "Building corpus");

    let records = read_records(&args.input)
        .with_context(|| format!("Failed to read records from '{}'", args.input.display()))?;
    let built = CorpusBuilder::build(records, &text_column, source)
        .with_context(|| format!("Failed to build corpus from '{}'", args.input.display()))?;
    Ok(built)
}

pub fn run_corpus_command(
    args: &CorpusArgs,
    output: Option<&PathBuf>,
    effective: &Effective,
) -> Result<()> {
    let built = build_corpus(args, effective)?;

    let path = if let Some(path) = output {
        write_records(path, built.corpus())
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        path.clone()
    } else {
        let dir = args.output_dir.as_ref().unwrap_or(&effective.output_dir);
        save_data(dir, &RunStamp::now(), built.corpus())
            .with_context(|| format!("Failed to save data in '{}'", dir.display()))?
    };

    info!(documents = built.len(), path = %path.display(), "Corpus written");
    println!("{}", path.display());
    Ok(())
}
