//! N-grams command: frequency table over the cleaned corpus.

use anyhow::{Context, Result};
use topic_modeler_core::ngrams::{
    NgramExtractor, NgramSize, StopwordSet, count_ngrams, load_custom_stopwords,
};
use tracing::info;

use crate::app_config::Effective;
use crate::cli::{CorpusArgs, NgramArgs};

use super::build_corpus;

pub fn run_ngrams_command(
    corpus_args: &CorpusArgs,
    args: &NgramArgs,
    effective: &Effective,
) -> Result<()> {
    let coerced = NgramSize::coerce(args.ngram_size.unwrap_or(effective.ngram_size))?;
    let stopwords = build_stopwords(args, effective)?;
    info!(n = coerced.size.get(), stopwords = stopwords.len(), "N-gram settings");

    let built = build_corpus(corpus_args, effective)?;
    let extractor = NgramExtractor::new(coerced.size, stopwords);
    let blob = extractor.run(&built);

    if args.blob {
        println!("{blob}");
        return Ok(());
    }

    let frequencies = count_ngrams(&blob);
    for entry in frequencies.top(args.top) {
        println!("{}\t{}", entry.ngram, entry.count);
    }
    Ok(())
}

fn build_stopwords(args: &NgramArgs, effective: &Effective) -> Result<StopwordSet> {
    let use_default = effective.default_stopwords && !args.no_default_stopwords;
    let language = args.language.as_deref().unwrap_or(&effective.language);

    let mut custom = args.stopwords.clone();
    if let Some(path) = args.stopwords_file.as_ref().or(effective.stopwords_file.as_ref()) {
        custom.extend(load_custom_stopwords(path)?);
    }

    StopwordSet::build(use_default.then_some(language), custom)
        .context("Disable default stopwords with --no-default-stopwords or pass --stopwords-file")
}
