//! Inspection of a collected dataset on disk.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::Result;
use crate::pipeline::name::SUPPORTED_EXTENSIONS;
use crate::pipeline::persist::IMAGES_DIR;

/// Summary of the images under `<output_dir>/images/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    /// Number of image files
    pub total_images: u64,

    /// Combined size of all image files
    pub total_bytes: u64,

    /// Image count per filename prefix (text before the first `_`)
    pub sources: BTreeMap<String, u64>,
}

impl DatasetStats {
    pub fn size_gb(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}

/// Count the images stored under `output_dir`.
///
/// A dataset with no `images/` directory has empty stats.
pub fn dataset_stats(output_dir: &Path) -> Result<DatasetStats> {
    let images_dir = output_dir.join(IMAGES_DIR);
    let mut stats = DatasetStats::default();
    if !images_dir.is_dir() {
        return Ok(stats);
    }

    for entry in WalkDir::new(&images_dir).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_image(path) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let prefix = name.split('_').next().unwrap_or_default().to_string();

        stats.total_images += 1;
        stats.total_bytes += entry.metadata().map_err(std::io::Error::from)?.len();
        *stats.sources.entry(prefix).or_default() += 1;
    }

    Ok(stats)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|s| *s == ext_lower)
        })
        .unwrap_or(false)
}

/// Filenames from a metadata CSV whose `description` or `title` mentions
/// any of `keywords` (case-insensitive substring match).
///
/// A missing CSV yields an empty list; a CSV without either column matches
/// nothing.
pub fn filter_by_keywords(csv_path: &Path, keywords: &[String]) -> Result<Vec<String>> {
    if !csv_path.exists() {
        return Ok(Vec::new());
    }

    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    let mut reader = csv::Reader::from_path(csv_path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (Some(filename_col), description_col, title_col) =
        (column("filename"), column("description"), column("title"))
    else {
        return Ok(Vec::new());
    };

    let mut matches = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or_default();
        let text = format!("{} {}", cell(description_col), cell(title_col)).to_lowercase();

        if keywords.iter().any(|k| text.contains(k.as_str())) {
            matches.push(cell(Some(filename_col)).to_string());
        }
    }

    Ok(matches)
}
