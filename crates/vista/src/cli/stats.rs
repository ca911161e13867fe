//! The `vista stats` command for summarizing a collected dataset.

use clap::Args;
use std::path::PathBuf;
use vista_core::output::to_json;
use vista_core::{dataset_stats, DatasetStats};

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Dataset directory (defaults to `general.output_dir` from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Print stats as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the stats command.
pub async fn execute(args: StatsArgs) -> anyhow::Result<()> {
    let output_dir = super::resolve_output_dir(args.output_dir.as_deref())?;
    let stats = dataset_stats(&output_dir)?;
    tracing::debug!("Dataset stats for {}: {:?}", output_dir.display(), stats);

    if args.json {
        println!("{}", to_json(&stats, true)?);
    } else {
        print!("{}", render(&stats));
    }
    Ok(())
}

fn render(stats: &DatasetStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("Images:  {}\n", stats.total_images));
    out.push_str(&format!("Size:    {:.3} GB\n", stats.size_gb()));
    if !stats.sources.is_empty() {
        out.push_str("Sources:\n");
        for (source, count) in &stats.sources {
            out.push_str(&format!("  {source:<12} {count:>6}\n"));
        }
    }
    out
}
