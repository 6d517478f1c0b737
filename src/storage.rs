//! Storage layer for tasktrackr
//!
//! Manages the single persisted tasks file and the files that sit beside it:
//!
//! ```text
//! <dir>/
//!   .tasktrackr.toml          # Optional configuration
//!   tasks.json                # JSON array of task records, store order
//!   tasks.json.lock           # Advisory lock held while saving
//!   tasks.json.corrupt[.N]    # Copy of an unreadable file, written by `reset`
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Storage manager for the tasks file
#[derive(Debug, Clone)]
pub struct Storage {
    tasks_file: PathBuf,
    lock_timeout_ms: u64,
}

impl Storage {
    /// Create storage backed by the given tasks file
    pub fn new(tasks_file: impl Into<PathBuf>) -> Self {
        Self {
            tasks_file: tasks_file.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Storage for a working directory, honoring its configuration
    pub fn for_dir(dir: &Path, config: &Config) -> Self {
        Self::new(config.tasks_path(dir))
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the tasks file
    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    /// Path where an unreadable tasks file is preserved on reset.
    ///
    /// `<file>.corrupt`, or `<file>.corrupt.N` with the first free `N` when
    /// earlier backups exist.
    pub fn corrupt_backup_file(&self) -> PathBuf {
        let base = format!("{}.corrupt", self.tasks_file.display());
        let mut candidate = PathBuf::from(&base);
        let mut suffix = 1u32;
        while candidate.exists() {
            candidate = PathBuf::from(format!("{base}.{suffix}"));
            suffix += 1;
        }
        candidate
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    /// Read JSON data from a file.
    ///
    /// A missing file is `Ok(None)`. Content that does not parse is
    /// `CorruptState`; the file is left as it is.
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(Error::persistence(path, err)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| Error::CorruptState {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write JSON data atomically while holding the save lock
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(data)?;
        json.push('\n');
        lock::write_atomic_locked(path, json.as_bytes(), self.lock_timeout_ms)
    }

    /// Copy the current tasks file aside so it can be replaced.
    ///
    /// Returns the backup path, or `None` when there is no file to preserve.
    /// Existing backups are never overwritten.
    pub fn preserve_tasks_file(&self) -> Result<Option<PathBuf>> {
        if !self.tasks_file.exists() {
            return Ok(None);
        }
        let backup = self.corrupt_backup_file();
        fs::copy(&self.tasks_file, &backup).map_err(|err| Error::persistence(&backup, err))?;
        Ok(Some(backup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_paths() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::for_dir(temp.path(), &Config::default());

        assert_eq!(storage.tasks_file(), temp.path().join("tasks.json"));
        assert_eq!(
            lock::lock_path_for(storage.tasks_file()),
            temp.path().join("tasks.json.lock")
        );
        assert_eq!(
            storage.corrupt_backup_file(),
            temp.path().join("tasks.json.corrupt")
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("tasks.json"));

        #[derive(Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Record {
            id: u64,
            title: String,
        }

        let data = vec![Record {
            id: 1,
            title: "first".to_string(),
        }];

        storage.write_json(storage.tasks_file(), &data).unwrap();
        let read_back: Option<Vec<Record>> = storage.read_json(storage.tasks_file()).unwrap();

        assert_eq!(read_back, Some(data));
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("tasks.json"));

        let data: Option<Vec<u64>> = storage.read_json(storage.tasks_file()).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_malformed_file_is_corrupt_and_untouched() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("tasks.json"));
        fs::write(storage.tasks_file(), "[{not json").unwrap();

        let result: Result<Option<Vec<u64>>> = storage.read_json(storage.tasks_file());
        assert!(matches!(result, Err(Error::CorruptState { .. })));
        assert_eq!(
            fs::read_to_string(storage.tasks_file()).unwrap(),
            "[{not json"
        );
    }

    #[test]
    fn test_preserve_tasks_file() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("tasks.json"));
        assert!(storage.preserve_tasks_file().unwrap().is_none());

        fs::write(storage.tasks_file(), "garbage").unwrap();
        let backup = storage.preserve_tasks_file().unwrap().unwrap();
        assert_eq!(fs::read_to_string(backup).unwrap(), "garbage");
    }

    #[test]
    fn test_preserve_keeps_earlier_backups() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::new(temp.path().join("tasks.json"));

        fs::write(storage.tasks_file(), "first").unwrap();
        let first = storage.preserve_tasks_file().unwrap().unwrap();
        fs::write(storage.tasks_file(), "second").unwrap();
        let second = storage.preserve_tasks_file().unwrap().unwrap();
        fs::write(storage.tasks_file(), "third").unwrap();
        let third = storage.preserve_tasks_file().unwrap().unwrap();

        assert_eq!(first, temp.path().join("tasks.json.corrupt"));
        assert_eq!(second, temp.path().join("tasks.json.corrupt.1"));
        assert_eq!(third, temp.path().join("tasks.json.corrupt.2"));
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }
}
