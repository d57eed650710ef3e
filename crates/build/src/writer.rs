//! Output writers: where rendered documents end up.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for generated files. Paths are relative to the writer's
/// own root.
pub trait OutputWriter {
    fn write(&mut self, path: &Path, content: &str) -> io::Result<()>;
}

/// Writes under a root directory, creating parent directories as needed.
/// Existing directories are not an error.
pub struct FileSystemWriter {
    root: PathBuf,
}

impl FileSystemWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemWriter { root: root.into() }
    }
}

impl OutputWriter for FileSystemWriter {
    fn write(&mut self, path: &Path, content: &str) -> io::Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)
    }
}

/// Keeps every written file in memory. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryWriter {
    pub files: BTreeMap<PathBuf, String>,
}

impl InMemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl OutputWriter for InMemoryWriter {
    fn write(&mut self, path: &Path, content: &str) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_writer_creates_directories_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FileSystemWriter::new(dir.path());
        let path = Path::new("build/light/values-light/colors.xml");
        writer.write(path, "<resources/>").unwrap();
        writer.write(path, "<resources></resources>").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(path)).unwrap(),
            "<resources></resources>"
        );
    }

    #[test]
    fn in_memory_writer_records_files() {
        let mut writer = InMemoryWriter::new();
        writer.write(Path::new("a/b.css"), ":root {}").unwrap();
        assert_eq!(writer.get("a/b.css"), Some(":root {}"));
        assert_eq!(writer.get("a/c.css"), None);
    }
}
