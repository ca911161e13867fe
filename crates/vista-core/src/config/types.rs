//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root of the dataset (images/, metadata/, annotations/ live below it)
    pub output_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("real_estate_dataset"),
        }
    }
}

/// HTTP fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Largest body accepted, in megabytes
    pub max_body_mb: u64,

    /// Pause between candidate downloads in milliseconds
    pub courtesy_delay_ms: u64,

    /// Pause between sources in milliseconds
    pub source_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            max_body_mb: 50,
            courtesy_delay_ms: 1000,
            source_delay_ms: 2000,
        }
    }
}

impl FetchConfig {
    /// Body cap in bytes.
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}

/// Quality gates applied to every downloaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Payloads shorter than this are rejected before decoding
    pub min_bytes: usize,

    /// Minimum decoded width in pixels
    pub min_width: u32,

    /// Minimum decoded height in pixels
    pub min_height: u32,

    /// Lowest accepted width/height ratio
    pub min_aspect: f64,

    /// Highest accepted width/height ratio
    pub max_aspect: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl ValidationConfig {
    /// Gates used for scraped and sample photos: 5000 bytes, 400x300.
    pub fn strict() -> Self {
        Self {
            min_bytes: 5000,
            min_width: 400,
            min_height: 300,
            min_aspect: 0.3,
            max_aspect: 3.0,
        }
    }

    /// Gates used for API sources: 1024 bytes, 300x300.
    pub fn lenient() -> Self {
        Self {
            min_bytes: 1024,
            min_width: 300,
            min_height: 300,
            ..Self::strict()
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Metadata sink format ("json", "jsonl" or "csv")
    pub metadata_format: String,

    /// Pretty-print JSON metadata
    pub pretty: bool,

    /// Write the annotation template after a run that stored images
    pub annotation_template: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            metadata_format: "json".to_string(),
            pretty: true,
            annotation_template: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Candidate source configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SourcesConfig {
    /// Fixed list of sample photo URLs
    pub samples: SampleUrlsConfig,

    /// Public dataset addressed by numeric image IDs
    pub coco: CocoConfig,

    /// Unsplash search API
    pub unsplash: Option<UnsplashConfig>,

    /// Flickr search API
    pub flickr: Option<FlickrConfig>,
}

/// Fixed sample URL list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleUrlsConfig {
    /// URLs to download, in order
    pub urls: Vec<String>,

    /// Value for the `category` metadata field
    pub category: String,
}

impl Default for SampleUrlsConfig {
    fn default() -> Self {
        Self {
            urls: [
                "photo-1586023492125-27b2c045efd7",
                "photo-1567538096630-e0c55bd6374c",
                "photo-1513584684374-8bab748fbf90",
                "photo-1502672260266-1c1ef2d93688",
                "photo-1560448204-e02f11c3d0e2",
            ]
            .iter()
            .map(|id| {
                format!(
                    "https://images.unsplash.com/{id}?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80"
                )
            })
            .collect(),
            category: "living_room".to_string(),
        }
    }
}

/// Bulk image host addressed by zero-padded numeric IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CocoConfig {
    /// Base URL; the image name `<id:012>.jpg` is appended
    pub base_url: String,

    /// Explicit image IDs; when empty, IDs are sampled from `id_min..=id_max`
    pub ids: Vec<u64>,

    /// Lowest ID in the sampling range
    pub id_min: u64,

    /// Highest ID in the sampling range
    pub id_max: u64,

    /// Number of IDs to sample
    pub sample_size: usize,

    /// Seed for reproducible sampling (random when unset)
    pub seed: Option<u64>,

    /// Value for the `category` metadata field
    pub category: String,
}

impl Default for CocoConfig {
    fn default() -> Self {
        Self {
            base_url: "http://images.cocodataset.org/train2017".to_string(),
            ids: Vec::new(),
            id_min: 1,
            id_max: 118_287,
            sample_size: 1000,
            seed: None,
            category: "tv_detection".to_string(),
        }
    }
}

/// Unsplash search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsplashConfig {
    /// API endpoint
    pub endpoint: String,

    /// Access key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Search queries
    pub queries: Vec<String>,

    /// Results per page
    pub per_page: u32,

    /// Pages fetched per query
    pub pages: u32,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.unsplash.com".to_string(),
            api_key: "${UNSPLASH_ACCESS_KEY}".to_string(),
            queries: vec![
                "living room tv".to_string(),
                "fireplace interior".to_string(),
                "modern living room".to_string(),
                "home theater".to_string(),
                "cozy living room fireplace".to_string(),
            ],
            per_page: 30,
            pages: 3,
        }
    }
}

/// Flickr search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickrConfig {
    /// REST endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Comma-separated tag sets, one search per entry
    pub tag_sets: Vec<String>,

    /// Results per page
    pub per_page: u32,

    /// Pages fetched per tag set
    pub pages: u32,
}

impl Default for FlickrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.flickr.com/services/rest/".to_string(),
            api_key: "${FLICKR_API_KEY}".to_string(),
            tag_sets: vec![
                "living,room,tv,television".to_string(),
                "fireplace,interior,home".to_string(),
                "family,room,entertainment".to_string(),
                "home,theater,tv,wall".to_string(),
            ],
            per_page: 50,
            pages: 2,
        }
    }
}
