//! Deterministic filenames derived from source URLs.

use reqwest::Url;

/// Extensions kept from the URL path; anything else is stored as `jpg`.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

const DEFAULT_EXTENSION: &str = "jpg";

/// Build `<tag>_<hash8>.<ext>` for a URL.
///
/// The hash covers the URL only, so re-running over the same URL overwrites
/// the earlier file instead of adding a copy.
pub fn file_name(url: &str, tag: &str) -> String {
    format!("{}_{}.{}", sanitize_tag(tag), url_hash(url), extension(url))
}

/// First 8 hex characters of the URL's BLAKE3 digest.
pub fn url_hash(url: &str) -> String {
    let hex = blake3::hash(url.as_bytes()).to_hex();
    hex[..8].to_string()
}

/// Lowercased extension of the URL path if supported, else `jpg`.
///
/// Query strings and fragments are ignored.
pub fn extension(url: &str) -> &'static str {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    let Some((_, ext)) = last_segment.rsplit_once('.') else {
        return DEFAULT_EXTENSION;
    };

    let ext = ext.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|supported| **supported == ext)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Tag for a search term, e.g. `("pexels", "living room tv")` -> `pexels_living_room_tv`.
pub fn source_tag(prefix: &str, term: &str) -> String {
    format!("{}_{}", prefix, term.trim().replace(' ', "_"))
}

/// Keep tags usable as a filename prefix: path separators and other
/// non-filename characters become `_`.
fn sanitize_tag(tag: &str) -> String {
    let cleaned: String = tag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "img".to_string()
    } else {
        cleaned
    }
}
