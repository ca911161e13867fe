//! Core data types for the Vista acquisition pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A URL awaiting fetch, validation, and persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Image URL
    pub url: String,

    /// Free-text tag embedded in the stored filename (e.g. "pexels_living_room_tv")
    pub tag: String,

    /// Origin label written to the `source` metadata field
    pub source: String,

    /// Source-specific metadata fields, in insertion order
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Create a candidate with no source-specific fields.
    pub fn new(url: impl Into<String>, tag: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: tag.into(),
            source: source.into(),
            extra: Map::new(),
        }
    }

    /// Attach a source-specific metadata field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Provenance record for one stored image.
///
/// Serializes flat: `filename, source_url, source`, then the source-specific
/// fields in the order the source attached them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Name of the file under `images/`
    pub filename: String,

    /// URL the bytes were downloaded from
    pub source_url: String,

    /// Origin label
    pub source: String,

    /// Source-specific fields plus decoded dimensions and download time
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Counters for one collector run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Candidates stored on disk
    pub stored: u64,

    /// Candidates skipped because their URL was already stored
    pub duplicates: u64,

    /// Candidates whose bytes failed a quality gate
    pub rejected: u64,

    /// Candidates lost to fetch or write errors
    pub failed: u64,

    /// Bytes written to the image store
    pub stored_bytes: u64,
}

impl RunStats {
    /// Total candidates seen.
    pub fn total(&self) -> u64 {
        self.stored + self.duplicates + self.rejected + self.failed
    }

    /// Add another run's counters into this one.
    pub fn merge(&mut self, other: &RunStats) {
        self.stored += other.stored;
        self.duplicates += other.duplicates;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.stored_bytes += other.stored_bytes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_flat_in_order() {
        let mut extra = Map::new();
        extra.insert("search_term".into(), Value::from("living room tv"));
        extra.insert("width".into(), Value::from(800));
        let record = MetadataRecord {
            filename: "pexels_living_room_tv_0a1b2c3d.jpg".into(),
            source_url: "https://example.com/a.jpg".into(),
            source: "pexels".into(),
            extra,
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"filename":"pexels_living_room_tv_0a1b2c3d.jpg","source_url":"https://example.com/a.jpg","source":"pexels","search_term":"living room tv","width":800}"#
        );

        let back: MetadataRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_candidate_with_field() {
        let c = Candidate::new("http://x/a.jpg", "coco_sample", "coco_dataset")
            .with_field("category", "tv_detection");
        assert_eq!(c.extra["category"], "tv_detection");
    }

    #[test]
    fn test_run_stats_merge() {
        let mut a = RunStats {
            stored: 2,
            rejected: 1,
            stored_bytes: 100,
            ..Default::default()
        };
        let b = RunStats {
            stored: 1,
            duplicates: 3,
            failed: 1,
            stored_bytes: 50,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.stored, 3);
        assert_eq!(a.total(), 8);
        assert_eq!(a.stored_bytes, 150);
    }
}
