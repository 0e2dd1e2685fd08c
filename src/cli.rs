//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

/// Prepare social-media posts for topic modeling.
///
/// Builds a cleaned corpus from JSON-lines records, extracts n-grams, and
/// merges topic results from an external pipeline back onto the records.
#[derive(Parser, Debug)]
#[command(name = "topic-modeler")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize text given as arguments, or one line at a time from stdin
    Clean {
        /// Text to normalize
        text: Vec<String>,
    },

    /// Build the cleaned corpus and write it as JSON lines
    Corpus {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Output file (defaults to `data_<stamp>.json` in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Count n-grams over the cleaned corpus
    Ngrams {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[command(flatten)]
        ngrams: NgramArgs,
    },

    /// Merge topic assignments from an external pipeline and save the run
    Enrich {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// JSON-lines file with one `{"topic", "probability", ...}` row per corpus record
        #[arg(long)]
        topics: PathBuf,
    },

    /// Print chart data for an enriched run
    Chart(ChartArgs),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print effective configuration values
    Show,
}

/// Options shared by commands that build a corpus.
#[derive(ClapArgs, Debug, Clone)]
pub struct CorpusArgs {
    /// JSON-lines input, one record per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column holding the post text
    #[arg(short = 't', long)]
    pub text_column: Option<String>,

    /// Data source (`reddit` trims posts to the sentences around their keyword)
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Directory for run artifacts
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// N-gram extraction options.
#[derive(ClapArgs, Debug, Clone)]
pub struct NgramArgs {
    /// N-gram size; non-integers are rounded with a warning
    #[arg(short = 'n', long)]
    pub ngram_size: Option<f64>,

    /// Language of the built-in stopword list
    #[arg(long)]
    pub language: Option<String>,

    /// Do not use the built-in stopword list
    #[arg(long)]
    pub no_default_stopwords: bool,

    /// Extra stopwords, one per line
    #[arg(long)]
    pub stopwords_file: Option<PathBuf>,

    /// Extra stopword (repeatable)
    #[arg(long = "stopword")]
    pub stopwords: Vec<String>,

    /// Number of n-grams to print
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Print the raw n-gram blob instead of the frequency table
    #[arg(long)]
    pub blob: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ChartArgs {
    /// Enriched JSON-lines data file
    #[arg(long, conflicts_with = "run", required_unless_present = "run")]
    pub data: Option<PathBuf>,

    /// Stamp of a saved run in the output directory
    #[arg(long)]
    pub run: Option<String>,

    /// Directory holding saved runs
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Leave out topics with an id at or above this
    #[arg(long)]
    pub limit_topics: Option<i64>,

    /// Column shown as post content
    #[arg(short = 't', long)]
    pub text_column: Option<String>,

    /// Print topic frequencies instead of scatter rows
    #[arg(long)]
    pub frequency: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["topic-modeler", "-v", "clean", "x"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["topic-modeler", "clean", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["topic-modeler", "--quiet", "config", "show"]).unwrap();
        assert!(args.quiet);
        assert!(matches!(
            args.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Args::try_parse_from(["topic-modeler"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["topic-modeler", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["topic-modeler", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_ngrams_options() {
        let args = Args::try_parse_from([
            "topic-modeler",
            "ngrams",
            "-i",
            "data.json",
            "-n",
            "2.6",
            "--no-default-stopwords",
            "--stopword",
            "reddit",
            "--stopword",
            "post",
        ])
        .unwrap();
        let Command::Ngrams { corpus, ngrams } = args.command else {
            panic!("expected ngrams command");
        };
        assert_eq!(corpus.input, PathBuf::from("data.json"));
        assert_eq!(ngrams.ngram_size, Some(2.6));
        assert!(ngrams.no_default_stopwords);
        assert_eq!(ngrams.stopwords, vec!["reddit", "post"]);
        assert_eq!(ngrams.top, 20);
    }

    #[test]
    fn test_cli_corpus_requires_input() {
        let err = Args::try_parse_from(["topic-modeler", "corpus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_chart_requires_data_or_run() {
        assert!(Args::try_parse_from(["topic-modeler", "chart"]).is_err());
        assert!(Args::try_parse_from(["topic-modeler", "chart", "--run", "01_01_2024_000000"]).is_ok());
        assert!(
            Args::try_parse_from(["topic-modeler", "chart", "--data", "d.json", "--run", "x"]).is_err()
        );
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["topic-modeler", "clean", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
