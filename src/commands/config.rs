//! Config command handlers: show effective configuration.

use crate::app_config::{LoadedConfig, VerbositySetting};

pub fn run_config_show_command(loaded_config: &LoadedConfig, verbosity: VerbositySetting) {
    let effective = loaded_config.effective();

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("text_column = {}", effective.text_column);
    println!("data_source = {}", effective.data_source);
    println!("language = {}", effective.language);
    println!("default_stopwords = {}", effective.default_stopwords);
    println!(
        "stopwords_file = {}",
        effective
            .stopwords_file
            .as_ref()
            .map_or_else(|| "<none>".to_string(), |path| path.display().to_string())
    );
    println!("ngram_size = {}", effective.ngram_size);
    println!("output_dir = {}", effective.output_dir.display());
    println!("limit_topics = {}", effective.limit_topics);
    println!("verbosity = {}", verbosity.as_str());
}
