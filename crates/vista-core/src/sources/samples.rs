//! Fixed list of sample photo URLs.

use async_trait::async_trait;

use super::CandidateSource;
use crate::config::SampleUrlsConfig;
use crate::error::SourceError;
use crate::types::Candidate;

/// Emits the configured URLs in order, tagged `sample_000`, `sample_001`, ...
pub struct SampleUrls {
    urls: Vec<String>,
    category: String,
}

impl SampleUrls {
    pub fn new(config: &SampleUrlsConfig) -> Self {
        Self {
            urls: config.urls.clone(),
            category: config.category.clone(),
        }
    }
}

#[async_trait]
impl CandidateSource for SampleUrls {
    fn name(&self) -> &str {
        "samples"
    }

    async fn enumerate(&self, _client: &reqwest::Client) -> Result<Vec<Candidate>, SourceError> {
        Ok(self
            .urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                Candidate::new(url.as_str(), format!("sample_{i:03}"), "sample_dataset")
                    .with_field("category", self.category.as_str())
            })
            .collect())
    }
}
