//! Chart command: print visualization data for an enriched run.

use anyhow::{Context, Result};
use topic_modeler_core::persist::{RunStamp, load_saved_run, read_records};
use topic_modeler_core::topics::{chart_rows, topic_frequency};

use crate::app_config::Effective;
use crate::cli::ChartArgs;

/// Prints one JSON object per chart row (or per topic with `--frequency`).
pub fn run_chart_command(args: &ChartArgs, effective: &Effective) -> Result<()> {
    let corpus = if let Some(stamp) = &args.run {
        let stamp: RunStamp = stamp.parse()?;
        let dir = args.output_dir.as_ref().unwrap_or(&effective.output_dir);
        load_saved_run(dir, &stamp)
            .with_context(|| format!("Failed to load run {stamp} from '{}'", dir.display()))?
            .corpus
    } else if let Some(path) = &args.data {
        read_records(path).with_context(|| format!("Failed to read '{}'", path.display()))?
    } else {
        anyhow::bail!("Pass --data <FILE> or --run <STAMP>");
    };

    let limit = args.limit_topics.unwrap_or(effective.limit_topics);
    if args.frequency {
        for count in topic_frequency(&corpus, limit) {
            println!("{}", serde_json::to_string(&count)?);
        }
    } else {
        let text_column = args.text_column.as_deref().unwrap_or(&effective.text_column);
        for row in chart_rows(&corpus, limit, text_column) {
            println!("{}", serde_json::to_string(&row)?);
        }
    }
    Ok(())
}
