//! HTTP download of candidate images.

use futures_util::StreamExt;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// Downloads candidate URLs with a browser-like User-Agent.
///
/// One GET per call, no retries. The underlying client is shared with
/// candidate sources so every request carries the same headers.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: u64,
}

impl Fetcher {
    /// Build a fetcher from config.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport {
                message: format!("Cannot build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            timeout: Duration::from_millis(config.timeout_ms),
            max_body_bytes: config.max_body_bytes(),
        })
    }

    /// HTTP client shared with candidate sources.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Download `url` and return the full body.
    ///
    /// Status codes >= 400 become [`FetchError::Status`]; timeouts, refused
    /// connections and broken streams become [`FetchError::Transport`].
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let declared = response.content_length();
        if declared.is_some_and(|len| len > self.max_body_bytes) {
            return Err(FetchError::TooLarge {
                limit: self.max_body_bytes,
            });
        }

        let capacity = declared.unwrap_or(0).min(self.max_body_bytes) as usize;
        let mut body = Vec::with_capacity(capacity);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if (body.len() + chunk.len()) as u64 > self.max_body_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        tracing::trace!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
