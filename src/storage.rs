//! Key-Value Storage
//!
//! Durable storage for UI preferences behind an injectable interface.
//! [`FileStorage`] keeps one JSON document per key in a directory;
//! [`MemoryStorage`] is the drop-in used by tests.

use crate::error::{BlogViewError, Result};
use dashmap::DashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// String key-value store
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Store `value` under `key`, replacing what was there
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// ============================================================================
// In-memory storage
// ============================================================================

/// Process-local storage, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// File storage
// ============================================================================

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", sanitize_key(key)?)))
    }
}

/// Map a key onto a safe file stem. ASCII alphanumerics, `-`, `_` and `.`
/// are kept; every other byte becomes `%XX`, so distinct keys never share
/// a file.
fn sanitize_key(key: &str) -> Result<String> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(BlogViewError::InvalidKey(key.to_string()));
    }
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    Ok(stem)
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlogViewError::storage(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| BlogViewError::storage(key, e))?;

        // Write-then-rename so readers never see a half-written value
        let tmp = path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            BlogViewError::storage(key, e)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlogViewError::storage(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("scrollMode").unwrap(), None);

        storage.set("scrollMode", "true").unwrap();
        assert_eq!(storage.get("scrollMode").unwrap().as_deref(), Some("true"));
        assert_eq!(storage.len(), 1);

        storage.remove("scrollMode").unwrap();
        storage.remove("scrollMode").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let prefs_dir = dir.path().join("prefs");

        FileStorage::new(&prefs_dir).set("scrollMode", "false").unwrap();

        let reopened = FileStorage::new(&prefs_dir);
        assert_eq!(reopened.get("scrollMode").unwrap().as_deref(), Some("false"));
        assert!(prefs_dir.join("scrollMode.json").exists());
        assert!(!prefs_dir.join("scrollMode.json.tmp").exists());
    }

    #[test]
    fn file_storage_missing_key_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("absent").unwrap(), None);
        storage.remove("absent").unwrap();

        storage.set("theme", "\"dark\"").unwrap();
        storage.remove("theme").unwrap();
        assert_eq!(storage.get("theme").unwrap(), None);
    }

    #[test]
    fn keys_are_sanitized_into_the_directory() {
        let storage = FileStorage::new("/data");
        assert_eq!(
            storage.path_for("../etc/passwd").unwrap(),
            PathBuf::from("/data/..%2Fetc%2Fpasswd.json")
        );
        assert_eq!(
            storage.path_for("café").unwrap(),
            PathBuf::from("/data/caf%C3%A9.json")
        );
        assert_eq!(
            storage.path_for("ui.scroll-mode_v1").unwrap(),
            PathBuf::from("/data/ui.scroll-mode_v1.json")
        );
        assert!(matches!(storage.path_for(""), Err(BlogViewError::InvalidKey(_))));
        assert!(matches!(storage.path_for(".."), Err(BlogViewError::InvalidKey(_))));
    }

    #[test]
    fn distinct_keys_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_ne!(storage.path_for("a/b").unwrap(), storage.path_for("a_b").unwrap());
        assert_ne!(storage.path_for("a%2Fb").unwrap(), storage.path_for("a/b").unwrap());

        storage.set("a/b", "1").unwrap();
        storage.set("a_b", "2").unwrap();
        assert_eq!(storage.get("a/b").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get("a_b").unwrap().as_deref(), Some("2"));
    }
}
