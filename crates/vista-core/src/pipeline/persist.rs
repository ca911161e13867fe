//! Writing accepted images into the dataset directory.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Subdirectory holding stored images.
pub const IMAGES_DIR: &str = "images";
/// Subdirectory holding metadata sinks.
pub const METADATA_DIR: &str = "metadata";
/// Subdirectory holding annotation scaffolds.
pub const ANNOTATIONS_DIR: &str = "annotations";

/// Stores image bytes under `<output_dir>/images/`.
///
/// Knows nothing about metadata; the collector records provenance.
#[derive(Debug, Clone)]
pub struct Persister {
    output_dir: PathBuf,
}

impl Persister {
    /// Create the dataset layout below `output_dir` (idempotent).
    pub fn new(output_dir: &Path) -> std::io::Result<Self> {
        for sub in [IMAGES_DIR, METADATA_DIR, ANNOTATIONS_DIR] {
            std::fs::create_dir_all(output_dir.join(sub))?;
        }
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(IMAGES_DIR)
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.output_dir.join(METADATA_DIR)
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.output_dir.join(ANNOTATIONS_DIR)
    }

    /// Write `bytes` verbatim to `images/<filename>` in a single write.
    ///
    /// An existing file with the same name is overwritten. On failure any
    /// partially written file is removed.
    pub fn persist(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, PipelineError> {
        let path = self.images_dir().join(filename);

        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(PipelineError::Persist {
                path,
                message: "filename must be a plain file name".to_string(),
            });
        }

        if let Err(e) = std::fs::write(&path, bytes) {
            if let Err(cleanup) = std::fs::remove_file(&path) {
                tracing::debug!("Could not remove partial file {}: {}", path.display(), cleanup);
            }
            return Err(PipelineError::Persist {
                path,
                message: e.to_string(),
            });
        }

        Ok(path)
    }
}
