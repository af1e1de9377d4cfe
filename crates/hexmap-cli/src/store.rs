//! File-backed map storage.

use hexmap_core::Storage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keeps the saved map in a single JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load_string(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Some(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file yet");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read state file");
                None
            }
        }
    }

    fn save_string(&mut self, data: &str) {
        // Written to a sibling file, then renamed over the target
        let tmp = self.path.with_extension("tmp");
        let result = std::fs::write(&tmp, data).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to save state file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("map.json"));
        assert_eq!(storage.load_string(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("map.json"));
        storage.save_string("{\"tiles\":[]}");
        storage.save_string("{}");
        assert_eq!(storage.load_string().as_deref(), Some("{}"));
        assert!(!dir.path().join("map.tmp").exists());
    }
}
