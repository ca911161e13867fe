//! Subcommand implementations for the `vista` binary.

pub mod collect;
pub mod config;
pub mod filter;
pub mod stats;
pub mod template;

use std::path::{Path, PathBuf};
use vista_core::Config;

/// Expand a leading `~` in a path given on the command line.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// `--output-dir` if given, else the configured dataset directory.
pub(crate) fn resolve_output_dir(flag: Option<&Path>) -> anyhow::Result<PathBuf> {
    match flag {
        Some(dir) => Ok(expand_path(dir)),
        None => Ok(Config::load()?.output_dir()),
    }
}
