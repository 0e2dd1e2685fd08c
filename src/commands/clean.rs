//! Clean command: normalize ad-hoc text.

use std::io::{self, BufRead, IsTerminal};

use anyhow::Result;
use topic_modeler_core::text::TextNormalizer;

/// Prints the normalized form of each argument, or of each stdin line when
/// no argument is given.
pub fn run_clean_command(text: &[String]) -> Result<()> {
    let normalizer = TextNormalizer::new();
    if !text.is_empty() {
        for item in text {
            println!("{}", normalizer.clean(item));
        }
        return Ok(());
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        tracing::info!("No input provided. Pass text as arguments or pipe lines via stdin.");
        return Ok(());
    }
    for line in stdin.lock().lines() {
        println!("{}", normalizer.clean(&line?));
    }
    Ok(())
}
