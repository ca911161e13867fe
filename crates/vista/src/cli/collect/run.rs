//! Source-by-source collection with progress, resume state, and a closing summary.

use console::Style;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::Instrument;

use vista_core::{
    read_all_metadata, write_annotation_template, write_metadata, Candidate, CandidateSource,
    Collector, MetadataRecord, Outcome, OutputFormat, Pipeline, RunStats, SeenUrls, SourceError,
    SourceFactory,
};

use super::{CollectContext, SEEN_URLS_FILE};

/// Run every selected source through the pipeline, then write the dataset files.
pub async fn collect_sources(ctx: CollectContext) -> anyhow::Result<()> {
    let persister = ctx.pipeline.persister();
    let metadata_dir = persister.metadata_dir();
    let seen_path = metadata_dir.join(SEEN_URLS_FILE);

    let (mut records, mut seen) = if ctx.resume {
        let (records, seen) = load_resume_state(&metadata_dir, ctx.format)?;
        tracing::info!(
            "Resuming: {} URLs already stored, {} metadata records",
            seen.len(),
            records.len()
        );
        (records, seen)
    } else {
        (Vec::new(), SeenUrls::new())
    };

    let source_delay = Duration::from_millis(ctx.config.fetch.source_delay_ms);
    let page_delay = ctx.pipeline.courtesy_delay();
    let mut totals = RunStats::default();
    let start_time = Instant::now();

    for (i, kind) in ctx.sources.iter().copied().enumerate() {
        if i > 0 && !source_delay.is_zero() {
            tokio::time::sleep(source_delay).await;
        }

        let source = match SourceFactory::create(kind, &ctx.config.sources, page_delay) {
            Ok(source) => source,
            Err(e @ SourceError::MissingCredential { .. }) => {
                tracing::warn!("Skipping {kind}: {e}");
                continue;
            }
            Err(e) => {
                tracing::error!("Skipping {kind}: {e}");
                continue;
            }
        };

        let span = tracing::info_span!("source", name = %kind);
        let (stats, new_records, returned_seen) =
            collect_one(&ctx.pipeline, source.as_ref(), seen, ctx.limit)
                .instrument(span)
                .await;

        seen = returned_seen;
        records.extend(new_records);
        totals.merge(&stats);
    }

    let metadata_path = write_metadata(
        &records,
        &metadata_dir,
        ctx.format,
        ctx.config.output.pretty,
    )?;

    if totals.stored > 0 && ctx.config.output.annotation_template {
        write_annotation_template(&persister.annotations_dir())?;
    }

    if ctx.resume {
        seen.save(&seen_path)?;
    }

    print_summary(&totals, start_time.elapsed(), &metadata_path);

    if totals.stored == 0 {
        tracing::warn!("No images were collected");
    }

    Ok(())
}

/// Earlier records (from every metadata format present) and the URLs to skip.
///
/// The seen set is `seen_urls.json` plus every loaded record's source URL, so
/// a dataset written without `--resume` is still skipped.
fn load_resume_state(
    metadata_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<(Vec<MetadataRecord>, SeenUrls)> {
    let mut seen = SeenUrls::load(&metadata_dir.join(SEEN_URLS_FILE))?;
    let records = read_all_metadata(metadata_dir, format)?;
    for record in &records {
        seen.mark(&record.source_url);
    }
    Ok((records, seen))
}

/// Enumerate one source and push its candidates through a collector.
///
/// Failures are logged and yield empty results so the next source still runs.
async fn collect_one(
    pipeline: &Pipeline,
    source: &dyn CandidateSource,
    seen: SeenUrls,
    limit: Option<usize>,
) -> (RunStats, Vec<MetadataRecord>, SeenUrls) {
    let candidates: Vec<Candidate> = match source.enumerate(pipeline.fetcher().client()).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Listing failed: {e}");
            return (RunStats::default(), Vec::new(), seen);
        }
    };

    if candidates.is_empty() {
        tracing::warn!("{} produced no candidates", source.name());
        return (RunStats::default(), Vec::new(), seen);
    }
    tracing::info!("{} candidate(s) from {}", candidates.len(), source.name());

    let progress = create_progress_bar(candidates.len() as u64);
    let mut collector = Collector::with_seen(pipeline, source.name(), seen);
    let mut stored: u64 = 0;

    let stats = collector
        .run(&candidates, limit, |_, outcome| {
            if let Outcome::Stored(_) = outcome {
                stored += 1;
            }
            progress.inc(1);
            progress.set_message(format!("{stored} stored"));
        })
        .await;

    progress.finish_and_clear();
    tracing::info!(
        "{}: stored {}, rejected {}, failed {}, duplicates {}",
        source.name(),
        stats.stored,
        stats.rejected,
        stats.failed,
        stats.duplicates
    );

    let (records, seen, _) = collector.into_parts();
    (stats, records, seen)
}

/// Create a progress bar for one source.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after collection.
fn print_summary(stats: &RunStats, elapsed: Duration, metadata_path: &Path) {
    let mb_stored = stats.stored_bytes as f64 / 1_000_000.0;
    let highlight = if stats.stored > 0 {
        Style::new().green().bold()
    } else {
        Style::new().yellow().bold()
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Stored:       {}", highlight.apply_to(format!("{:>8}", stats.stored)));
    if stats.rejected > 0 {
        eprintln!("    Rejected:     {:>8}", stats.rejected);
    }
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.duplicates > 0 {
        eprintln!("    Duplicates:   {:>8}", stats.duplicates);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total());
    eprintln!("    Size:         {:>7.1} MB", mb_stored);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
    eprintln!("    Metadata: {}", metadata_path.display());
}
