//! Source provider abstraction for filesystem-independent loading.
//!
//! The [`SourceProvider`] trait abstracts pattern expansion and file reads so
//! the loader can run against the filesystem or an in-memory file set.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Trait that abstracts file I/O for the source loader.
pub trait SourceProvider {
    /// Expand a glob pattern into matching file paths, sorted lexically.
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, std::io::Error>;

    /// Read the source text for a given path.
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;

    /// `path` relative to the provider's root, for classification. Paths
    /// outside the root come back unchanged.
    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path
    }
}

/// Filesystem-backed provider. Relative patterns are resolved against
/// `base`.
pub struct FileSystemProvider {
    base: PathBuf,
}

impl FileSystemProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl SourceProvider for FileSystemProvider {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, std::io::Error> {
        let full = self.base.join(pattern);
        let full = full.to_string_lossy();
        let entries = glob::glob(&full).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid pattern '{}': {}", pattern, e),
            )
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| e.into_error())?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base).unwrap_or(path)
    }
}

/// In-memory source provider for tests and embedding.
///
/// Patterns are matched against the stored paths with glob semantics.
pub struct InMemoryProvider {
    files: BTreeMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(files: impl IntoIterator<Item = (P, S)>) -> Self {
        let files = files
            .into_iter()
            .map(|(p, s)| (Self::normalize_path(&p.into()), s.into()))
            .collect();
        Self { files }
    }

    /// Normalize a path by resolving `.` and `..` components without
    /// touching the filesystem.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    components.pop();
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl SourceProvider for InMemoryProvider {
    fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>, std::io::Error> {
        let pattern = glob::Pattern::new(pattern).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid pattern '{}': {}", pattern, e),
            )
        })?;
        // BTreeMap keys are already sorted.
        Ok(self
            .files
            .keys()
            .filter(|p| pattern.matches_path(p))
            .cloned()
            .collect())
    }

    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }
}
