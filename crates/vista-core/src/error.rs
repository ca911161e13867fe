//! Error types for the Vista acquisition pipeline.
//!
//! Errors are organized by stage so every failure carries the context needed
//! to diagnose it (URL, filename, HTTP status) when it is logged and skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Vista operations.
#[derive(Error, Debug)]
pub enum VistaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Candidate enumeration errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Why an HTTP fetch produced no bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a status code >= 400
    #[error("HTTP {code}")]
    Status { code: u16 },

    /// Timeout, connection failure, or broken body stream
    #[error("transport: {message}")]
    Transport { message: String },

    /// Body exceeded the configured download cap
    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl FetchError {
    /// A 404 is an expected miss (e.g. a sparse dataset ID), not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { code: 404 })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::Status {
                code: status.as_u16(),
            },
            None => FetchError::Transport {
                message: e.to_string(),
            },
        }
    }
}

/// Pipeline errors that abort a candidate after it passed validation.
///
/// Fetch failures and quality-gate rejections are ordinary per-candidate
/// outcomes and carry their own types ([`FetchError`] and the validator's
/// rejection reason).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Writing the image to disk failed
    #[error("Persist failed for {path}: {message}")]
    Persist { path: PathBuf, message: String },
}

/// Errors raised while enumerating candidates from a source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Listing request failed
    #[error("{source_name} request failed: {message}")]
    Http {
        source_name: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Listing response could not be understood
    #[error("{source_name} returned an unexpected response: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Source needs an API credential that is not configured
    #[error("{source_name} requires an API key (set it in the config or via ${{{env_var}}})")]
    MissingCredential {
        source_name: String,
        env_var: String,
    },
}

/// Convenience type alias for Vista results.
pub type Result<T> = std::result::Result<T, VistaError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
