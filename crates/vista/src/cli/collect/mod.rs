//! The `vista collect` command for building a dataset.

mod run;
mod setup;
pub mod types;

pub use types::{MetadataFormat, Profile, SourceArg};

use clap::Args;
use std::path::PathBuf;
use vista_core::{Config, OutputFormat as CoreOutputFormat, Pipeline, SourceKind};

use run::collect_sources;
use setup::setup_collector;

/// File under `metadata/` holding the URLs stored by earlier runs.
pub const SEEN_URLS_FILE: &str = "seen_urls.json";

/// Arguments for the `collect` command.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Dataset directory (defaults to `general.output_dir` from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Source to collect from; repeat to select several (defaults to all, in order)
    #[arg(short, long = "source", value_enum)]
    pub sources: Vec<SourceArg>,

    /// Metadata format (defaults to `output.metadata_format` from config)
    #[arg(short, long, value_enum)]
    pub format: Option<MetadataFormat>,

    /// Stop each source after this many stored images
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Pause between image downloads, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Validation gate preset (overrides `[validation]`)
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Skip URLs stored by previous runs and append to their metadata
    #[arg(long)]
    pub resume: bool,

    /// Seed for reproducible COCO ID sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Collection context assembled by setup_collector().
pub(crate) struct CollectContext {
    pub config: Config,
    pub pipeline: Pipeline,
    pub sources: Vec<SourceKind>,
    pub format: CoreOutputFormat,
    pub output_dir: PathBuf,
    pub limit: Option<usize>,
    pub resume: bool,
}

/// Execute the collect command.
pub async fn execute(args: CollectArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let ctx = setup_collector(config, &args)?;

    tracing::info!(
        "Collecting into {} from: {}",
        ctx.output_dir.display(),
        ctx.sources
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    collect_sources(ctx).await
}
