//! Bulk dataset host addressed by zero-padded numeric image IDs.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::CandidateSource;
use crate::config::CocoConfig;
use crate::error::SourceError;
use crate::types::Candidate;

/// Builds `<base_url>/<id:012>.jpg` URLs without any listing request.
///
/// Many IDs in the range do not exist on the host; those 404 at fetch time
/// and are skipped by the pipeline.
pub struct CocoSample {
    config: CocoConfig,
}

impl CocoSample {
    pub fn new(config: &CocoConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Image IDs to request: the explicit list, or a sample without
    /// replacement from `id_min..=id_max`.
    pub fn ids(&self) -> Vec<u64> {
        if !self.config.ids.is_empty() {
            return self.config.ids.clone();
        }

        let span = self
            .config
            .id_max
            .saturating_sub(self.config.id_min)
            .saturating_add(1);
        let span = usize::try_from(span).unwrap_or(usize::MAX);
        let amount = self.config.sample_size.min(span);

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        rand::seq::index::sample(&mut rng, span, amount)
            .into_iter()
            .map(|offset| self.config.id_min + offset as u64)
            .collect()
    }

    /// URL of one image on the host.
    pub fn image_url(&self, id: u64) -> String {
        format!("{}/{:012}.jpg", self.config.base_url.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl CandidateSource for CocoSample {
    fn name(&self) -> &str {
        "coco"
    }

    async fn enumerate(&self, _client: &reqwest::Client) -> Result<Vec<Candidate>, SourceError> {
        let ids = self.ids();
        tracing::debug!("Sampled {} COCO image IDs", ids.len());

        Ok(ids
            .into_iter()
            .map(|id| {
                Candidate::new(self.image_url(id), "coco_sample", "coco_dataset")
                    .with_field("coco_id", id)
                    .with_field("category", self.config.category.as_str())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(sample_size: usize, id_min: u64, id_max: u64) -> CocoSample {
        CocoSample::new(&CocoConfig {
            id_min,
            id_max,
            sample_size,
            seed: Some(42),
            ..Default::default()
        })
    }

    #[test]
    fn test_image_url_is_zero_padded() {
        let source = CocoSample::new(&CocoConfig::default());
        assert_eq!(
            source.image_url(9),
            "http://images.cocodataset.org/train2017/000000000009.jpg"
        );
    }

    #[test]
    fn test_seeded_sample_is_reproducible_and_in_range() {
        let a = seeded(50, 100, 999).ids();
        let b = seeded(50, 100, 999).ids();
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        assert!(a.iter().all(|id| (100..=999).contains(id)));

        let unique: std::collections::HashSet<_> = a.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_sample_size_capped_by_range() {
        let ids = seeded(100, 1, 10).ids();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_full_id_range_does_not_overflow() {
        let ids = seeded(5, 0, u64::MAX).ids();
        assert_eq!(ids.len(), 5);

        let top = seeded(3, u64::MAX - 2, u64::MAX).ids();
        let mut top_sorted = top.clone();
        top_sorted.sort_unstable();
        assert_eq!(top_sorted, vec![u64::MAX - 2, u64::MAX - 1, u64::MAX]);
    }

    #[test]
    fn test_explicit_ids_win() {
        let source = CocoSample::new(&CocoConfig {
            ids: vec![9, 25, 30],
            ..Default::default()
        });
        assert_eq!(source.ids(), vec![9, 25, 30]);
    }

    #[tokio::test]
    async fn test_candidates_carry_id_and_category() {
        let source = CocoSample::new(&CocoConfig {
            ids: vec![9, 25],
            ..Default::default()
        });
        let candidates = source.enumerate(&reqwest::Client::new()).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].tag, "coco_sample");
        assert_eq!(candidates[1].source, "coco_dataset");
        assert_eq!(candidates[1].extra["coco_id"], 25);
        assert_eq!(candidates[1].extra["category"], "tv_detection");
        assert!(candidates[1].url.ends_with("/000000000025.jpg"));
    }
}
