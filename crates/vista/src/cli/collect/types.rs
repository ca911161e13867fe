//! CLI enum types for the collect command: sources, metadata format, validation profile.

use clap::ValueEnum;
use vista_core::config::ValidationConfig;
use vista_core::{OutputFormat as CoreOutputFormat, SourceKind};

/// Candidate sources selectable with `--source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Fixed list of sample photo URLs
    Samples,
    /// Random sample of COCO train2017 images
    Coco,
    /// Unsplash search API (needs UNSPLASH_ACCESS_KEY)
    Unsplash,
    /// Flickr search API (needs FLICKR_API_KEY)
    Flickr,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Samples => SourceKind::Samples,
            SourceArg::Coco => SourceKind::Coco,
            SourceArg::Unsplash => SourceKind::Unsplash,
            SourceArg::Flickr => SourceKind::Flickr,
        }
    }
}

/// Supported metadata formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetadataFormat {
    /// Pretty JSON array (metadata/metadata.json)
    Json,
    /// One JSON object per line (metadata/metadata.jsonl)
    Jsonl,
    /// Table with one column per field (metadata/dataset_metadata.csv)
    Csv,
}

impl From<MetadataFormat> for CoreOutputFormat {
    fn from(format: MetadataFormat) -> Self {
        match format {
            MetadataFormat::Json => CoreOutputFormat::Json,
            MetadataFormat::Jsonl => CoreOutputFormat::JsonLines,
            MetadataFormat::Csv => CoreOutputFormat::Csv,
        }
    }
}

impl std::fmt::Display for MetadataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataFormat::Json => write!(f, "json"),
            MetadataFormat::Jsonl => write!(f, "jsonl"),
            MetadataFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Validation gate presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// 5 KB minimum, at least 400x300
    Strict,
    /// 1 KB minimum, at least 300x300
    Lenient,
}

impl Profile {
    pub fn gates(self) -> ValidationConfig {
        match self {
            Profile::Strict => ValidationConfig::strict(),
            Profile::Lenient => ValidationConfig::lenient(),
        }
    }
}
