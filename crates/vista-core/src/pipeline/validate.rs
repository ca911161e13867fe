//! Quality gates for downloaded image bytes.

use image::GenericImageView;
use std::fmt;

use crate::config::ValidationConfig;

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Bytes decode to an image that passes every gate
    Accepted { width: u32, height: u32 },
    /// First gate that failed
    Rejected(Rejection),
}

/// Why a payload was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Fewer bytes than `min_bytes`
    TooSmall { bytes: usize },
    /// Not a decodable raster image
    InvalidFormat,
    /// Decoded dimensions below the minimum
    Dimensions { width: u32, height: u32 },
    /// Width/height ratio outside the accepted band (banners, strips)
    AspectRatio { ratio: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooSmall { .. } => write!(f, "too small"),
            Rejection::InvalidFormat => write!(f, "invalid format"),
            Rejection::Dimensions { width, height } => write!(f, "too small: {width}x{height}"),
            Rejection::AspectRatio { .. } => write!(f, "invalid aspect ratio"),
        }
    }
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted { .. })
    }
}

/// Validates downloaded bytes against the configured gates.
///
/// Pure: the same bytes always produce the same result.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with the given gates.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Gates in effect.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run the gates in order, stopping at the first failure:
    /// byte length, decodability, minimum dimensions, aspect ratio.
    pub fn validate(&self, bytes: &[u8]) -> Validation {
        if bytes.len() < self.config.min_bytes {
            return Validation::Rejected(Rejection::TooSmall { bytes: bytes.len() });
        }

        let (width, height) = match Self::decode_dimensions(bytes) {
            Some(dims) => dims,
            None => return Validation::Rejected(Rejection::InvalidFormat),
        };

        if width < self.config.min_width || height < self.config.min_height {
            return Validation::Rejected(Rejection::Dimensions { width, height });
        }

        let ratio = f64::from(width) / f64::from(height);
        if ratio < self.config.min_aspect || ratio > self.config.max_aspect {
            return Validation::Rejected(Rejection::AspectRatio { ratio });
        }

        Validation::Accepted { width, height }
    }

    /// Fully decode the payload (format sniffed from content, not the URL).
    fn decode_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
        let format = image::guess_format(bytes).ok()?;
        let image = image::load_from_memory_with_format(bytes, format).ok()?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        Some((width, height))
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
