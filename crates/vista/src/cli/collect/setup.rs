//! Collector setup: config overrides, output layout, source selection.

use anyhow::Context;
use vista_core::{Config, OutputFormat as CoreOutputFormat, Pipeline, SourceKind};

use super::{CollectArgs, CollectContext};

/// Apply CLI overrides to the loaded config and prepare everything a run needs.
pub fn setup_collector(mut config: Config, args: &CollectArgs) -> anyhow::Result<CollectContext> {
    apply_overrides(&mut config, args);

    let output_dir = match &args.output_dir {
        Some(dir) => crate::cli::expand_path(dir),
        None => config.output_dir(),
    };

    let format = match args.format {
        Some(format) => format.into(),
        None => CoreOutputFormat::parse(&config.output.metadata_format).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown metadata format '{}', writing JSON",
                config.output.metadata_format
            );
            CoreOutputFormat::Json
        }),
    };

    let pipeline = Pipeline::new(&config, &output_dir).with_context(|| {
        format!(
            "Cannot prepare output directory {}\n\n  Hint: Check that the path is writable.",
            output_dir.display()
        )
    })?;

    Ok(CollectContext {
        config,
        pipeline,
        sources: selected_sources(args),
        format,
        output_dir,
        limit: args.limit,
        resume: args.resume,
    })
}

fn apply_overrides(config: &mut Config, args: &CollectArgs) {
    if let Some(delay_ms) = args.delay_ms {
        config.fetch.courtesy_delay_ms = delay_ms;
    }
    if let Some(profile) = args.profile {
        config.validation = profile.gates();
    }
    if let Some(seed) = args.seed {
        config.sources.coco.seed = Some(seed);
    }
}

/// Sources in the order given, without repeats; all sources when none given.
fn selected_sources(args: &CollectArgs) -> Vec<SourceKind> {
    if args.sources.is_empty() {
        return SourceKind::ALL.to_vec();
    }

    let mut kinds: Vec<SourceKind> = Vec::new();
    for kind in args.sources.iter().copied().map(SourceKind::from) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}
