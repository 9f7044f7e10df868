// Collection registry - Deduplicated, insertion-ordered source files

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{Dimensions, MediaKind};

/// A collected source file with cached display metadata
#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size_bytes: Option<u64>,
    pub dimensions: Option<Dimensions>,
}

impl SourceFile {
    pub fn new(path: PathBuf, size_bytes: Option<u64>, dimensions: Option<Dimensions>) -> Self {
        Self {
            path,
            size_bytes,
            dimensions,
        }
    }

    /// Read size (and pixel dimensions for images) from disk.
    /// Lookup failures leave the field empty.
    pub fn inspect(path: &Path, kind: MediaKind) -> Self {
        let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());
        let dimensions = match kind {
            MediaKind::Image => crate::engine::image::read_dimensions(path),
            MediaKind::Video => None,
        };
        Self::new(path.to_path_buf(), size_bytes, dimensions)
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

/// Ordered set of source files for one pipeline
#[derive(Debug, Clone)]
pub struct SourceCollection {
    kind: MediaKind,
    files: Vec<SourceFile>,
    seen: HashSet<PathBuf>,
}

impl SourceCollection {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Add a path, inspecting its metadata. Returns false for duplicates
    /// and empty paths.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if path.as_os_str().is_empty() || self.seen.contains(&path) {
            return false;
        }
        let file = SourceFile::inspect(&path, self.kind);
        self.insert(file)
    }

    /// Insert an already-inspected file. Returns false for duplicates.
    pub fn insert(&mut self, file: SourceFile) -> bool {
        if !self.seen.insert(file.path.clone()) {
            return false;
        }
        self.files.push(file);
        true
    }

    /// Add many paths, returning how many were new
    pub fn extend<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            if self.add(path) {
                added += 1;
            }
        }
        added
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.seen.clear();
    }

    /// Remove and return every file, leaving the collection empty
    pub fn drain(&mut self) -> Vec<SourceFile> {
        self.seen.clear();
        std::mem::take(&mut self.files)
    }
}
