//! URL-level deduplication within a collector run.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// URLs that already produced a stored image.
///
/// Lives as long as one collector. [`SeenUrls::load`] and [`SeenUrls::save`]
/// exist for opt-in resumable runs; nothing persists the set implicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenUrls {
    urls: HashSet<String>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `url` was already stored in this run.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Record a stored URL. Returns false if it was already present.
    pub fn mark(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Load a set saved by [`SeenUrls::save`]. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let urls: Vec<String> = serde_json::from_str(&content)?;
        Ok(Self {
            urls: urls.into_iter().collect(),
        })
    }

    /// Save as a sorted JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut urls: Vec<&String> = self.urls.iter().collect();
        urls.sort();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&urls)?)?;
        Ok(())
    }
}
