//! CLI command handlers.

mod chart;
mod clean;
mod config;
mod corpus;
mod enrich;
mod ngrams;

pub use chart::run_chart_command;
pub use clean::run_clean_command;
pub use config::run_config_show_command;
pub use corpus::{build_corpus, run_corpus_command};
pub use enrich::run_enrich_command;
pub use ngrams::run_ngrams_command;
