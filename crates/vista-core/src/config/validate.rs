//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_ms must be > 0".into(),
            ));
        }
        if self.fetch.max_body_mb == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.max_body_mb must be > 0".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fetch.user_agent must not be empty".into(),
            ));
        }
        let v = &self.validation;
        if !(v.min_aspect > 0.0) || !v.max_aspect.is_finite() {
            return Err(ConfigError::ValidationError(
                "validation.min_aspect must be > 0 and validation.max_aspect finite".into(),
            ));
        }
        if v.min_aspect > v.max_aspect {
            return Err(ConfigError::ValidationError(
                "validation.min_aspect must be <= validation.max_aspect".into(),
            ));
        }
        if OutputFormat::parse(&self.output.metadata_format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.metadata_format must be json, jsonl or csv (got {:?})",
                self.output.metadata_format
            )));
        }
        let coco = &self.sources.coco;
        if coco.ids.is_empty() && coco.id_min > coco.id_max {
            return Err(ConfigError::ValidationError(
                "sources.coco.id_min must be <= sources.coco.id_max".into(),
            ));
        }
        Ok(())
    }
}
