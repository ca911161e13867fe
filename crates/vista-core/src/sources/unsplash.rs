//! Unsplash photo search.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{get_json, CandidateSource};
use crate::config::UnsplashConfig;
use crate::error::SourceError;
use crate::pipeline::name::source_tag;
use crate::types::Candidate;

/// Runs every configured query through `/search/photos`, `pages` pages each.
pub struct UnsplashSearch {
    config: UnsplashConfig,
    api_key: String,
    page_delay: Duration,
}

impl UnsplashSearch {
    pub fn new(config: UnsplashConfig, api_key: String, page_delay: Duration) -> Self {
        Self {
            config,
            api_key,
            page_delay,
        }
    }

    async fn search_page(
        &self,
        client: &reqwest::Client,
        query: &str,
        page: u32,
    ) -> Result<Vec<Photo>, SourceError> {
        let url = format!("{}/search/photos", self.config.endpoint.trim_end_matches('/'));
        let request = client.get(url).query(&[
            ("query", query.to_string()),
            ("per_page", self.config.per_page.to_string()),
            ("page", page.to_string()),
            ("client_id", self.api_key.clone()),
        ]);
        let response: SearchResponse = get_json("unsplash", request).await?;
        Ok(response.results)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    id: String,
    description: Option<String>,
    urls: PhotoUrls,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

#[async_trait]
impl CandidateSource for UnsplashSearch {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn enumerate(&self, client: &reqwest::Client) -> Result<Vec<Candidate>, SourceError> {
        let mut candidates = Vec::new();
        let mut first_request = true;

        for query in &self.config.queries {
            for page in 1..=self.config.pages {
                if !first_request && !self.page_delay.is_zero() {
                    tokio::time::sleep(self.page_delay).await;
                }
                first_request = false;

                let photos = match self.search_page(client, query, page).await {
                    Ok(photos) => photos,
                    Err(e) => {
                        tracing::error!(query = %query, page, "Unsplash search failed: {}", e);
                        break;
                    }
                };
                tracing::debug!("Unsplash '{}' page {}: {} results", query, page, photos.len());

                if photos.is_empty() {
                    break;
                }

                let tag = source_tag("unsplash", query);
                candidates.extend(photos.into_iter().filter_map(|photo| {
                    let url = photo.urls.regular?;
                    Some(
                        Candidate::new(url, tag.as_str(), "unsplash")
                            .with_field("unsplash_id", photo.id)
                            .with_field("description", photo.description.unwrap_or_default())
                            .with_field("search_term", query.as_str()),
                    )
                }));
            }
        }

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{serve, Route};

    const PAGE: &str = r#"{
        "total": 2,
        "results": [
            {"id": "abc", "description": "Cozy living room with TV", "urls": {"regular": "https://img.example/abc.jpg"}},
            {"id": "def", "description": null, "urls": {"regular": "https://img.example/def.jpg"}},
            {"id": "nourl", "description": "broken", "urls": {}}
        ]
    }"#;

    fn search(endpoint: String, queries: &[&str], pages: u32) -> UnsplashSearch {
        UnsplashSearch::new(
            UnsplashConfig {
                endpoint,
                queries: queries.iter().map(|q| q.to_string()).collect(),
                pages,
                per_page: 2,
                ..Default::default()
            },
            "test-key".to_string(),
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn test_results_become_candidates() {
        let server = serve(vec![Route::json("/search/photos", PAGE)]).await;
        let source = search(server.base().to_string(), &["living room tv"], 1);

        let candidates = source.enumerate(&reqwest::Client::new()).await.unwrap();

        assert_eq!(candidates.len(), 2);
        let first = &candidates[0];
        assert_eq!(first.url, "https://img.example/abc.jpg");
        assert_eq!(first.tag, "unsplash_living_room_tv");
        assert_eq!(first.source, "unsplash");
        assert_eq!(first.extra["unsplash_id"], "abc");
        assert_eq!(first.extra["description"], "Cozy living room with TV");
        assert_eq!(first.extra["search_term"], "living room tv");
        assert_eq!(candidates[1].extra["description"], "");
    }

    #[tokio::test]
    async fn test_pages_and_credentials_sent() {
        let server = serve(vec![Route::json("/search/photos", PAGE)]).await;
        let source = search(server.base().to_string(), &["fireplace"], 2);

        let candidates = source.enumerate(&reqwest::Client::new()).await.unwrap();
        assert_eq!(candidates.len(), 4);

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("client_id=test-key"));
        assert!(requests[0].contains("page=1"));
        assert!(requests[1].contains("page=2"));
        assert!(requests[1].contains("per_page=2"));
    }

    #[tokio::test]
    async fn test_failed_query_is_skipped() {
        let server = serve(vec![Route::status("/search/photos", 403)]).await;
        let source = search(server.base().to_string(), &["a", "b"], 3);

        let candidates = source.enumerate(&reqwest::Client::new()).await.unwrap();
        assert!(candidates.is_empty());
        // One failed page per query, remaining pages skipped
        assert_eq!(server.requests().len(), 2);
    }
}
