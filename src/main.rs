//! CLI entry point for the topic-modeler tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;

use app_config::{VerbositySetting, load_default_file_config};
use cli::{Args, Command, ConfigCommand};

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded_config = load_default_file_config()?;
    let effective = loaded_config.effective();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let verbosity = if args.quiet {
        VerbositySetting::Quiet
    } else {
        match args.verbose {
            0 => effective.verbosity,
            1 => VerbositySetting::Verbose,
            _ => VerbositySetting::Debug,
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match &args.command {
        Command::Clean { text } => commands::run_clean_command(text)?,
        Command::Corpus { corpus, output } => {
            commands::run_corpus_command(corpus, output.as_ref(), &effective)?;
        }
        Command::Ngrams { corpus, ngrams } => {
            commands::run_ngrams_command(corpus, ngrams, &effective)?;
        }
        Command::Enrich { corpus, topics } => {
            commands::run_enrich_command(corpus, topics, &effective)?;
        }
        Command::Chart(chart) => commands::run_chart_command(chart, &effective)?,
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::run_config_show_command(&loaded_config, verbosity),
        },
    }

    Ok(())
}
