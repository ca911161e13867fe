//! Flickr photo search.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{get_json, CandidateSource};
use crate::config::FlickrConfig;
use crate::error::SourceError;
use crate::pipeline::name::source_tag;
use crate::types::Candidate;

/// Runs `flickr.photos.search` once per configured tag set.
pub struct FlickrSearch {
    config: FlickrConfig,
    api_key: String,
    page_delay: Duration,
}

impl FlickrSearch {
    pub fn new(config: FlickrConfig, api_key: String, page_delay: Duration) -> Self {
        Self {
            config,
            api_key,
            page_delay,
        }
    }

    async fn search_page(
        &self,
        client: &reqwest::Client,
        tags: &str,
        page: u32,
    ) -> Result<Vec<Photo>, SourceError> {
        let request = client.get(&self.config.endpoint).query(&[
            ("method", "flickr.photos.search".to_string()),
            ("api_key", self.api_key.clone()),
            ("tags", tags.to_string()),
            ("tag_mode", "any".to_string()),
            ("media", "photos".to_string()),
            ("per_page", self.config.per_page.to_string()),
            ("page", page.to_string()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
            ("extras", "url_c,url_b".to_string()),
        ]);
        let response: SearchResponse = get_json("flickr", request).await?;

        if response.stat != "ok" {
            return Err(SourceError::Parse {
                source_name: "flickr".to_string(),
                message: response
                    .message
                    .unwrap_or_else(|| format!("stat={}", response.stat)),
            });
        }

        Ok(response.photos.map(|p| p.photo).unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    stat: String,
    message: Option<String>,
    photos: Option<PhotoPage>,
}

#[derive(Deserialize)]
struct PhotoPage {
    #[serde(default)]
    photo: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    id: String,
    #[serde(default)]
    title: String,
    url_b: Option<String>,
    url_c: Option<String>,
}

impl Photo {
    /// Large size when available, else medium.
    fn best_url(&self) -> Option<&str> {
        self.url_b.as_deref().or(self.url_c.as_deref())
    }
}

#[async_trait]
impl CandidateSource for FlickrSearch {
    fn name(&self) -> &str {
        "flickr"
    }

    async fn enumerate(&self, client: &reqwest::Client) -> Result<Vec<Candidate>, SourceError> {
        let mut candidates = Vec::new();
        let mut first_request = true;

        for tags in &self.config.tag_sets {
            for page in 1..=self.config.pages {
                if !first_request && !self.page_delay.is_zero() {
                    tokio::time::sleep(self.page_delay).await;
                }
                first_request = false;

                let photos = match self.search_page(client, tags, page).await {
                    Ok(photos) => photos,
                    Err(e) => {
                        tracing::error!(tags = %tags, page, "Flickr search failed: {}", e);
                        break;
                    }
                };
                tracing::debug!("Flickr '{}' page {}: {} results", tags, page, photos.len());

                if photos.is_empty() {
                    break;
                }

                let tag = source_tag("flickr", &tags.replace(',', " "));
                for photo in &photos {
                    let Some(url) = photo.best_url() else {
                        continue;
                    };
                    candidates.push(
                        Candidate::new(url, tag.as_str(), "flickr")
                            .with_field("flickr_id", photo.id.as_str())
                            .with_field("title", photo.title.as_str())
                            .with_field("tags", tags.as_str()),
                    );
                }
            }
        }

        Ok(candidates)
    }
}
