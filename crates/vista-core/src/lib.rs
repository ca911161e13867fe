//! Vista Core - photo acquisition library for training datasets.
//!
//! Vista downloads candidate photos from public sources, keeps only the ones
//! that pass basic quality gates, and writes them to a dataset directory with
//! a provenance record per image.
//!
//! # Architecture
//!
//! Every candidate moves through the same stages, one at a time:
//!
//! ```text
//! Source → Dedup check → Fetch → Validate → Name → Persist → Metadata record
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use vista_core::{Collector, Config, Pipeline, SourceFactory, SourceKind};
//!
//! #[tokio::main]
//! async fn main() -> vista_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::new(&config, &config.output_dir())?;
//!
//!     let source = SourceFactory::create(SourceKind::Samples, &config.sources, Default::default())?;
//!     let candidates = source.enumerate(pipeline.fetcher().client()).await?;
//!
//!     let mut collector = Collector::new(&pipeline, source.name());
//!     let stats = collector.run(&candidates, None, |_, _| {}).await;
//!     println!("Stored {} images", stats.stored);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod types;

#[cfg(test)]
mod testutil;

// Re-exports for convenient access
pub use config::Config;
pub use dataset::{dataset_stats, filter_by_keywords, DatasetStats};
pub use error::{
    ConfigError, FetchError, PipelineError, PipelineResult, Result, SourceError, VistaError,
};
pub use output::{
    read_all_metadata, read_metadata, write_annotation_template, write_metadata, OutputFormat,
    OutputWriter,
};
pub use pipeline::{Collector, Outcome, Pipeline, SeenUrls, Validator};
pub use sources::{CandidateSource, SourceFactory, SourceKind};
pub use types::{Candidate, MetadataRecord, RunStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
