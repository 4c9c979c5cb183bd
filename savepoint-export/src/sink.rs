//! Delivery targets for export artifacts.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Somewhere a finished export artifact can be handed off to.
pub trait ArtifactSink: Send + Sync {
    /// Deliver `contents` under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact could not be stored.
    fn deliver(&self, file_name: &str, contents: &[u8]) -> std::io::Result<()>;
}

/// Writes artifacts into a directory, replacing files of the same name.
///
/// Writes are blocking `std::fs` calls made on the caller's task. Artifacts
/// are single JSON documents, so the export pipeline calls it inline.
///
/// File names must be a single path component; anything that would resolve
/// outside the directory is rejected with [`std::io::ErrorKind::InvalidInput`].
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing into `dir`. The directory is created on first
    /// delivery if it does not exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&self, file_name: &str, contents: &[u8]) -> std::io::Result<()> {
        if Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("artifact name {file_name:?} is not a plain file name"),
            ));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        tracing::info!("Wrote export artifact to {}", path.display());
        Ok(())
    }
}

/// Keeps delivered artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts delivered so far, oldest first.
    #[must_use]
    pub fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&self, file_name: &str, contents: &[u8]) -> std::io::Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((file_name.to_string(), contents.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(dir.path().join("out"));

        sink.deliver("Main_Menu.json", b"{}").expect("deliver");
        sink.deliver("Main_Menu.json", b"[]").expect("overwrite");

        let written = std::fs::read(dir.path().join("out/Main_Menu.json")).expect("read");
        assert_eq!(written, b"[]");
    }

    #[test]
    fn test_directory_sink_rejects_escaping_names() {
        let root = tempfile::tempdir().expect("tempdir");
        let sink = DirectorySink::new(root.path().join("out"));

        for name in ["../escaped.json", "nested/menu.json", "..", ""] {
            let err = sink.deliver(name, b"{}").unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput, "{name}");
        }
        assert!(!root.path().join("escaped.json").exists());
    }

    #[test]
    fn test_memory_sink_records() {
        let sink = MemorySink::new();
        sink.deliver("a.json", b"1").expect("deliver");
        assert_eq!(sink.artifacts(), vec![("a.json".to_string(), b"1".to_vec())]);
    }
}
