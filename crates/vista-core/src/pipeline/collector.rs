//! Pipeline orchestration - wires fetch, validate, name, dedup, and persist.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::config::Config;
use crate::error::{ConfigError, FetchError, PipelineError, Result};
use crate::types::{Candidate, MetadataRecord, RunStats};

use super::dedup::SeenUrls;
use super::fetch::Fetcher;
use super::name;
use super::persist::Persister;
use super::validate::{Rejection, Validation, Validator};

/// The shared, stateless stages of the pipeline.
///
/// One `Pipeline` serves every source in a process; per-run state lives in
/// [`Collector`].
pub struct Pipeline {
    fetcher: Fetcher,
    validator: Validator,
    persister: Persister,
    courtesy_delay: Duration,
}

impl Pipeline {
    /// Build every stage from config, creating the dataset layout under `output_dir`.
    pub fn new(config: &Config, output_dir: &Path) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetch).map_err(|e| {
            ConfigError::ValidationError(format!("cannot build HTTP client: {e}"))
        })?;
        Ok(Self {
            fetcher,
            validator: Validator::new(config.validation.clone()),
            persister: Persister::new(output_dir)?,
            courtesy_delay: Duration::from_millis(config.fetch.courtesy_delay_ms),
        })
    }

    /// Assemble a pipeline from already-built stages.
    pub fn from_parts(
        fetcher: Fetcher,
        validator: Validator,
        persister: Persister,
        courtesy_delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            validator,
            persister,
            courtesy_delay,
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn persister(&self) -> &Persister {
        &self.persister
    }

    pub fn courtesy_delay(&self) -> Duration {
        self.courtesy_delay
    }
}

/// What happened to one candidate.
#[derive(Debug)]
pub enum Outcome {
    /// Bytes written and metadata recorded
    Stored(MetadataRecord),
    /// URL already stored in this run; nothing fetched
    Duplicate,
    /// Downloaded bytes failed a quality gate
    Rejected(Rejection),
    /// Download failed
    FetchFailed(FetchError),
    /// Image could not be written
    PersistFailed(PipelineError),
}

impl Outcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Outcome::Stored(_))
    }
}

/// Runs candidates from one source through the pipeline.
///
/// Owns the run's [`SeenUrls`] and metadata list; records are kept in
/// collection order.
pub struct Collector<'a> {
    pipeline: &'a Pipeline,
    source: String,
    seen: SeenUrls,
    records: Vec<MetadataRecord>,
    stats: RunStats,
}

impl<'a> Collector<'a> {
    /// Start a collector with an empty seen set.
    pub fn new(pipeline: &'a Pipeline, source: impl Into<String>) -> Self {
        Self::with_seen(pipeline, source, SeenUrls::new())
    }

    /// Start a collector that treats `seen` as already stored.
    pub fn with_seen(pipeline: &'a Pipeline, source: impl Into<String>, seen: SeenUrls) -> Self {
        Self {
            pipeline,
            source: source.into(),
            seen,
            records: Vec::new(),
            stats: RunStats::default(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn seen(&self) -> &SeenUrls {
        &self.seen
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Hand back the run's records, seen set, and counters.
    pub fn into_parts(self) -> (Vec<MetadataRecord>, SeenUrls, RunStats) {
        (self.records, self.seen, self.stats)
    }

    /// Fetch, validate, and store one candidate.
    ///
    /// Never fails: every error is logged with the URL and filename and
    /// reported as an [`Outcome`] so the caller moves on to the next candidate.
    pub async fn process(&mut self, candidate: &Candidate) -> Outcome {
        let url = candidate.url.as_str();

        if self.seen.contains(url) {
            tracing::debug!("Already stored, skipping: {}", url);
            self.stats.duplicates += 1;
            return Outcome::Duplicate;
        }

        let filename = name::file_name(url, &candidate.tag);
        tracing::info!("Downloading: {}", url);

        let bytes = match self.pipeline.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!("Image not found, skipping: {}", url);
                } else {
                    tracing::error!(url, filename = %filename, "Error downloading: {}", e);
                }
                self.stats.failed += 1;
                return Outcome::FetchFailed(e);
            }
        };

        let (width, height) = match self.pipeline.validator.validate(&bytes) {
            Validation::Accepted { width, height } => (width, height),
            Validation::Rejected(reason) => {
                if let Rejection::AspectRatio { ratio } = reason {
                    tracing::warn!("Skipping {}: {} ({:.2})", filename, reason, ratio);
                } else {
                    tracing::warn!("Skipping {}: {}", filename, reason);
                }
                self.stats.rejected += 1;
                return Outcome::Rejected(reason);
            }
        };

        if let Err(e) = self.pipeline.persister.persist(&bytes, &filename) {
            tracing::error!(url, filename = %filename, "{}", e);
            self.stats.failed += 1;
            return Outcome::PersistFailed(e);
        }

        self.seen.mark(url);
        self.stats.stored += 1;
        self.stats.stored_bytes += bytes.len() as u64;
        tracing::info!("Saved: {} ({}x{})", filename, width, height);

        let mut extra = candidate.extra.clone();
        extra.insert("width".into(), Value::from(width));
        extra.insert("height".into(), Value::from(height));
        extra.insert("downloaded_at".into(), Value::from(unix_seconds()));

        let record = MetadataRecord {
            filename,
            source_url: candidate.url.clone(),
            source: candidate.source.clone(),
            extra,
        };
        self.records.push(record.clone());
        Outcome::Stored(record)
    }

    /// Process candidates in order until exhausted or `limit` images are stored.
    ///
    /// Sleeps the courtesy delay between network requests (never before the
    /// first one). `on_outcome` sees every candidate's result, e.g. to drive
    /// a progress bar.
    pub async fn run<F>(
        &mut self,
        candidates: &[Candidate],
        limit: Option<usize>,
        mut on_outcome: F,
    ) -> RunStats
    where
        F: FnMut(&Candidate, &Outcome),
    {
        let start = self.stats;
        let mut requested = false;

        for candidate in candidates {
            if limit.is_some_and(|max| (self.stats.stored - start.stored) as usize >= max) {
                tracing::debug!("Reached limit of {:?} stored images", limit);
                break;
            }

            if requested && !self.seen.contains(&candidate.url) && !self.pipeline.courtesy_delay.is_zero() {
                tokio::time::sleep(self.pipeline.courtesy_delay).await;
            }

            let outcome = self.process(candidate).await;
            if !matches!(outcome, Outcome::Duplicate) {
                requested = true;
            }
            on_outcome(candidate, &outcome);
        }

        RunStats {
            stored: self.stats.stored - start.stored,
            duplicates: self.stats.duplicates - start.duplicates,
            rejected: self.stats.rejected - start.rejected,
            failed: self.stats.failed - start.failed,
            stored_bytes: self.stats.stored_bytes - start.stored_bytes,
        }
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, ValidationConfig};
    use crate::testutil::{jpeg, png, serve, Route, TestServer};

    fn pipeline(output_dir: &Path) -> Pipeline {
        Pipeline::from_parts(
            Fetcher::new(&FetchConfig::default()).unwrap(),
            Validator::new(ValidationConfig::default()),
            Persister::new(output_dir).unwrap(),
            Duration::ZERO,
        )
    }

    async fn gallery() -> TestServer {
        serve(vec![
            Route::ok("/living.jpg", "image/jpeg", jpeg(800, 600)),
            Route::ok("/fireplace.png", "image/png", png(640, 480)),
            Route::ok("/banner.jpg", "image/jpeg", jpeg(1200, 100)),
            Route::ok("/tiny.gif", "image/gif", vec![0x47; 200]),
            Route::status("/broken.jpg", 500),
        ])
        .await
    }

    fn candidate(server: &TestServer, path: &str) -> Candidate {
        Candidate::new(server.url(path), "sample_000", "sample_dataset")
            .with_field("category", "living_room")
    }

    #[tokio::test]
    async fn test_process_stores_valid_image() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "samples");

        let c = candidate(&server, "/living.jpg");
        let outcome = collector.process(&c).await;

        let Outcome::Stored(record) = outcome else {
            panic!("expected stored, got {outcome:?}");
        };
        assert_eq!(record.filename, name::file_name(&c.url, "sample_000"));
        assert_eq!(record.source_url, c.url);
        assert_eq!(record.source, "sample_dataset");
        assert_eq!(record.extra["category"], "living_room");
        assert_eq!(record.extra["width"], 800);
        assert_eq!(record.extra["height"], 600);

        let stored = std::fs::read(dir.path().join("images").join(&record.filename)).unwrap();
        assert_eq!(stored, jpeg(800, 600));
        assert!(collector.seen().contains(&c.url));
        assert_eq!(collector.records().len(), 1);
    }

    #[tokio::test]
    async fn test_failures_leave_no_state() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "samples");

        for (path, expect) in [
            ("/banner.jpg", "rejected"),
            ("/tiny.gif", "rejected"),
            ("/broken.jpg", "fetch"),
            ("/gone.jpg", "fetch"),
        ] {
            let c = candidate(&server, path);
            let outcome = collector.process(&c).await;
            match expect {
                "rejected" => assert!(matches!(outcome, Outcome::Rejected(_)), "{path}"),
                _ => assert!(matches!(outcome, Outcome::FetchFailed(_)), "{path}"),
            }
            assert!(!collector.seen().contains(&c.url));
        }

        assert!(collector.records().is_empty());
        assert_eq!(std::fs::read_dir(pipeline.persister().images_dir()).unwrap().count(), 0);
        let stats = collector.stats();
        assert_eq!((stats.rejected, stats.failed, stats.stored), (2, 2, 0));
    }

    #[tokio::test]
    async fn test_run_skips_repeats_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "samples");

        let candidates = vec![
            candidate(&server, "/living.jpg"),
            candidate(&server, "/banner.jpg"),
            candidate(&server, "/fireplace.png"),
            candidate(&server, "/living.jpg"),
        ];
        let mut seen_outcomes = Vec::new();
        let stats = collector
            .run(&candidates, None, |_, o| seen_outcomes.push(o.is_stored()))
            .await;

        assert_eq!(seen_outcomes, vec![true, false, true, false]);
        assert_eq!(stats.stored, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total(), 4);

        let urls: Vec<&str> = collector.records().iter().map(|r| r.source_url.as_str()).collect();
        assert_eq!(urls, vec![candidates[0].url.as_str(), candidates[2].url.as_str()]);

        // The repeat never reached the server
        let living_hits = server
            .requests()
            .iter()
            .filter(|r| r.starts_with("GET /living.jpg"))
            .count();
        assert_eq!(living_hits, 1);
    }

    #[tokio::test]
    async fn test_second_pass_with_same_seen_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "samples");

        let candidates = vec![
            candidate(&server, "/living.jpg"),
            candidate(&server, "/fireplace.png"),
        ];
        collector.run(&candidates, None, |_, _| {}).await;
        let second = collector.run(&candidates, None, |_, _| {}).await;

        assert_eq!(second.stored, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(collector.records().len(), 2);

        let names: std::collections::HashSet<&str> =
            collector.records().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn test_resumed_seen_set_skips_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());

        let c = candidate(&server, "/living.jpg");
        let mut seen = SeenUrls::new();
        seen.mark(&c.url);

        let mut collector = Collector::with_seen(&pipeline, "samples", seen);
        assert!(matches!(collector.process(&c).await, Outcome::Duplicate));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let server = gallery().await;
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "coco");

        let candidates = vec![
            candidate(&server, "/gone.jpg"),
            candidate(&server, "/living.jpg"),
            candidate(&server, "/fireplace.png"),
        ];
        let stats = collector.run(&candidates, Some(1), |_, _| {}).await;

        assert_eq!(stats.stored, 1);
        assert_eq!(stats.failed, 1);
        assert!(!server.requests().iter().any(|r| r.starts_with("GET /fireplace.png")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_only_between_requests() {
        let dir = tempfile::tempdir().unwrap();
        let delay = Duration::from_secs(1);
        let pipeline = Pipeline::from_parts(
            Fetcher::new(&FetchConfig::default()).unwrap(),
            Validator::default(),
            Persister::new(dir.path()).unwrap(),
            delay,
        );

        // Unsupported schemes fail inside the client without touching the
        // network, so only the courtesy sleeps move the paused clock.
        let stored = Candidate::new("ftp://x/stored.jpg", "sample_000", "sample_dataset");
        let candidates = vec![
            stored.clone(),
            Candidate::new("ftp://x/a.jpg", "sample_001", "sample_dataset"),
            stored.clone(),
            Candidate::new("ftp://x/b.jpg", "sample_002", "sample_dataset"),
            stored,
            Candidate::new("ftp://x/c.jpg", "sample_003", "sample_dataset"),
        ];
        let mut seen = SeenUrls::new();
        seen.mark("ftp://x/stored.jpg");
        let mut collector = Collector::with_seen(&pipeline, "samples", seen);

        let start = tokio::time::Instant::now();
        let stats = collector.run(&candidates, None, |_, _| {}).await;

        assert_eq!(stats.duplicates, 3);
        assert_eq!(stats.failed, 3);
        // No sleep before the first request or any duplicate: a, (dup), +b, (dup), +c
        assert_eq!(start.elapsed(), delay * 2);
    }

    #[tokio::test]
    async fn test_empty_run_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(dir.path());
        let mut collector = Collector::new(&pipeline, "empty");
        let stats = collector.run(&[], None, |_, _| {}).await;
        assert_eq!(stats, RunStats::default());
        assert!(collector.records().is_empty());
    }
}
