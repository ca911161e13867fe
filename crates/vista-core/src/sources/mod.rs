//! Candidate sources.
//!
//! Every origin of image URLs (a fixed sample list, a bulk dataset host,
//! stock-photo search APIs) implements [`CandidateSource`]. A source only
//! enumerates candidates; fetching and validation belong to the pipeline.

mod coco;
mod flickr;
mod samples;
mod unsplash;

pub use coco::CocoSample;
pub use flickr::FlickrSearch;
pub use samples::SampleUrls;
pub use unsplash::UnsplashSearch;

use crate::config::{env_var_name, resolve_env_var, SourcesConfig};
use crate::error::SourceError;
use crate::types::Candidate;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Trait that all candidate sources implement.
///
/// Uses `async_trait` so sources can be held as `Box<dyn CandidateSource>`.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Source name for logging and the `--source` flag.
    fn name(&self) -> &str;

    /// List candidates in the order they should be processed.
    ///
    /// Search sources log and skip failed pages; an error means the source
    /// produced nothing usable.
    async fn enumerate(&self, client: &reqwest::Client) -> Result<Vec<Candidate>, SourceError>;
}

/// Known source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Samples,
    Coco,
    Unsplash,
    Flickr,
}

impl SourceKind {
    /// Every kind, in default collection order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Samples,
        SourceKind::Coco,
        SourceKind::Unsplash,
        SourceKind::Flickr,
    ];

    /// Parse a kind from its name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "samples" | "sample" => Some(Self::Samples),
            "coco" => Some(Self::Coco),
            "unsplash" => Some(Self::Unsplash),
            "flickr" => Some(Self::Flickr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Samples => "samples",
            Self::Coco => "coco",
            Self::Unsplash => "unsplash",
            Self::Flickr => "flickr",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factory that builds a source from config.
pub struct SourceFactory;

impl SourceFactory {
    /// Create the source for `kind`.
    ///
    /// `page_delay` is slept between listing requests of paginated sources.
    /// Search sources fail with [`SourceError::MissingCredential`] when their
    /// API key does not resolve.
    pub fn create(
        kind: SourceKind,
        config: &SourcesConfig,
        page_delay: Duration,
    ) -> Result<Box<dyn CandidateSource>, SourceError> {
        match kind {
            SourceKind::Samples => Ok(Box::new(SampleUrls::new(&config.samples))),
            SourceKind::Coco => Ok(Box::new(CocoSample::new(&config.coco))),
            SourceKind::Unsplash => {
                let cfg = config.unsplash.clone().unwrap_or_default();
                let api_key = api_key("unsplash", &cfg.api_key, "UNSPLASH_ACCESS_KEY")?;
                Ok(Box::new(UnsplashSearch::new(cfg, api_key, page_delay)))
            }
            SourceKind::Flickr => {
                let cfg = config.flickr.clone().unwrap_or_default();
                let api_key = api_key("flickr", &cfg.api_key, "FLICKR_API_KEY")?;
                Ok(Box::new(FlickrSearch::new(cfg, api_key, page_delay)))
            }
        }
    }
}

fn api_key(source_name: &str, configured: &str, fallback_var: &str) -> Result<String, SourceError> {
    resolve_env_var(configured).ok_or_else(|| SourceError::MissingCredential {
        source_name: source_name.to_string(),
        env_var: env_var_name(configured).unwrap_or(fallback_var).to_string(),
    })
}

/// Map a transport failure on a listing request.
pub(crate) fn http_error(source_name: &str, e: reqwest::Error) -> SourceError {
    SourceError::Http {
        source_name: source_name.to_string(),
        message: e.to_string(),
        status_code: e.status().map(|s| s.as_u16()),
    }
}

/// Send a listing request and decode its JSON body.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    source_name: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let resp = request.send().await.map_err(|e| http_error(source_name, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            source_name: source_name.to_string(),
            message: format!("HTTP {status}"),
            status_code: Some(status.as_u16()),
        });
    }

    resp.json::<T>().await.map_err(|e| SourceError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}
