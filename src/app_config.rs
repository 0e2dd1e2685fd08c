//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use topic_modeler_core::corpus::DataSource;

/// Default column holding post text.
pub const DEFAULT_TEXT_COLUMN: &str = "body";
/// Default stopword language.
pub const DEFAULT_LANGUAGE: &str = "english";
/// Default number of topics shown in charts.
pub const DEFAULT_LIMIT_TOPICS: i64 = 10;

/// File configuration for `topic-modeler` defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    /// Column holding the post text.
    pub text_column: Option<String>,
    /// `reddit` trims posts to the sentences around their keyword.
    pub data_source: Option<String>,
    /// Language of the built-in stopword list.
    pub language: Option<String>,
    /// Whether the built-in stopword list is used.
    pub default_stopwords: Option<bool>,
    /// Extra stopwords, one per line.
    pub stopwords_file: Option<PathBuf>,
    /// N-gram size; non-integers are rounded with a warning.
    pub ngram_size: Option<f64>,
    /// Directory for run artifacts.
    pub output_dir: Option<PathBuf>,
    /// Topics with an id at or above this are left out of charts.
    pub limit_topics: Option<i64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(column) = &self.text_column
            && column.trim().is_empty()
        {
            bail!("Invalid config value for `text_column`: must not be empty");
        }

        if let Some(n) = self.ngram_size
            && !(n.is_finite() && n.round() >= 1.0)
        {
            bail!("Invalid config value for `ngram_size`: {n}. Expected a number that rounds to at least 1");
        }

        if let Some(limit) = self.limit_topics
            && limit < 1
        {
            bail!("Invalid config value for `limit_topics`: {limit}. Expected at least 1");
        }

        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerbositySetting {
    #[default]
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Tracing filter used when neither `RUST_LOG` nor CLI flags decide.
    #[must_use]
    pub fn filter(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Settings after applying file config over built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Effective {
    pub text_column: String,
    pub data_source: DataSource,
    pub language: String,
    pub default_stopwords: bool,
    pub stopwords_file: Option<PathBuf>,
    pub ngram_size: f64,
    pub output_dir: PathBuf,
    pub limit_topics: i64,
    pub verbosity: VerbositySetting,
}

impl Effective {
    #[must_use]
    pub fn from_file(config: Option<&FileConfig>) -> Self {
        let config = config.cloned().unwrap_or_default();
        Self {
            text_column: config
                .text_column
                .unwrap_or_else(|| DEFAULT_TEXT_COLUMN.to_string()),
            data_source: config
                .data_source
                .as_deref()
                .map(|source| source.parse().unwrap_or_default())
                .unwrap_or_default(),
            language: config
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            default_stopwords: config.default_stopwords.unwrap_or(true),
            stopwords_file: config.stopwords_file,
            ngram_size: config.ngram_size.unwrap_or(1.0),
            output_dir: config.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            limit_topics: config.limit_topics.unwrap_or(DEFAULT_LIMIT_TOPICS),
            verbosity: config.verbosity.unwrap_or_default(),
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

impl LoadedConfig {
    #[must_use]
    pub fn effective(&self) -> Effective {
        Effective::from_file(self.config.as_ref())
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/topic-modeler/config.toml`
/// 2. `$HOME/.config/topic-modeler/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("topic-modeler")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("topic-modeler")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!(
                "Invalid config syntax on line {}: expected key = value",
                line_index + 1
            );
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {}", line_index + 1);

        match key {
            "text_column" => {
                cfg.text_column = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "data_source" => {
                cfg.data_source = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "language" => {
                cfg.language = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "default_stopwords" => {
                cfg.default_stopwords = Some(parse_boolean(value).with_context(invalid)?);
            }
            "stopwords_file" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.stopwords_file = Some(PathBuf::from(parsed));
            }
            "ngram_size" => {
                cfg.ngram_size = Some(parse_number(value).with_context(invalid)?);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "limit_topics" => {
                cfg.limit_topics = Some(parse_integer_i64(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!(
                        "Invalid `verbosity` value '{}' on line {}",
                        parsed,
                        line_index + 1
                    )
                })?);
            }
            unknown => {
                bail!(
                    "Unknown configuration key: '{}' on line {}",
                    unknown,
                    line_index + 1
                );
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_i64(raw_value: &str) -> Result<i64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    Ok(token.parse::<i64>()?)
}

fn parse_number(raw_value: &str) -> Result<f64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected numeric value");
    }
    Ok(token.parse::<f64>()?)
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
