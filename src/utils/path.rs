//! Source path expansion

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::model::MediaKind;

/// Expand command-line inputs into source files.
///
/// Files are kept as given, whatever their extension. Directories yield the
/// files with an accepted extension for `kind`, sorted by path; subdirectories
/// are only entered when `recursive` is set. Missing paths are kept so they
/// show up as per-file failures.
pub fn expand_sources(inputs: &[PathBuf], kind: MediaKind, recursive: bool) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = scan_directory(input, kind, recursive);
            debug!("{} matching file(s) in {}", found.len(), input.display());
            sources.extend(found);
        } else {
            if !input.exists() {
                warn!("{} does not exist", input.display());
            }
            sources.push(input.clone());
        }
    }
    sources
}

fn scan_directory(dir: &Path, kind: MediaKind, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| kind.accepts(path))
        .collect();
    found.sort();
    found
}

/// Display name of a path (file name, or the whole path)
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
