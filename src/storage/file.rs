//! File storage backend.
//!
//! Stores each key as `<key>.json` inside a data directory. The directory is
//! created on first write; a missing file reads as an absent key.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the target, so readers never observe a partially written value.

use super::backend::{BackendType, StorageBackend};
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// File extension for stored values.
const VALUE_EXTENSION: &str = "json";

/// Storage backend that keeps one file per key.
pub struct FileBackend {
    /// Directory holding the value files.
    root: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }
}

/// Keys become file names, so they are restricted to a safe alphabet.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if !valid {
        return Err(Error::Other(format!("Invalid storage key: {:?}", key)));
    }
    Ok(())
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), bytes = content.len(), "read value");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

        debug!(path = %path.display(), bytes = value.len(), "wrote value");
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn backend_type(&self) -> &'static str {
        BackendType::File.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key_is_none() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());
        assert_eq!(backend.get("notes").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("data");
        let mut backend = FileBackend::new(&root);

        backend.set("notes", "[]").unwrap();

        assert!(root.join("notes.json").exists());
        assert_eq!(backend.get("notes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_set_replaces_value() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        backend.set("notes", "first").unwrap();
        backend.set("notes", "second").unwrap();

        assert_eq!(backend.get("notes").unwrap().as_deref(), Some("second"));
        // Only the value file remains, no temp leftovers
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        assert!(backend.set("../escape", "x").is_err());
        assert!(backend.set("", "x").is_err());
        assert!(backend.set(".hidden", "x").is_err());
        assert!(backend.get("a/b").is_err());
    }

    #[test]
    fn test_dotted_key_allowed() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::new(temp.path());

        backend.set("notes.corrupt", "garbage").unwrap();
        assert!(temp.path().join("notes.corrupt.json").exists());
    }

    #[test]
    fn test_location_and_type() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());
        assert_eq!(backend.location(), temp.path().display().to_string());
        assert_eq!(backend.backend_type(), "file");
    }
}
