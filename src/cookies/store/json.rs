//! JSON-backed cookie store.
//!
//! `JsonCookieStore` keeps one jar snapshot in a single JSON file on disk.
//!
//! ### I/O characteristics
//! - Every `persist` rewrites the whole file. Writes go to a temporary file in
//!   the same directory which is then renamed over the target, so readers see
//!   either the old or the new snapshot, never a torn one.
//! - A missing file means "nothing persisted yet".
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::cookies::store::CookieStore;

/// A JSON file holding the snapshot of one cookie jar.
#[derive(Debug)]
pub struct JsonCookieStore {
    /// Path to the JSON file where the snapshot is stored.
    path: PathBuf,
    /// Serializes writers so renames land in call order.
    write_lock: Mutex<()>,
}

impl JsonCookieStore {
    /// Creates a store for `path`. The file is created on the first persist.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl CookieStore for JsonCookieStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("cannot read cookie file {}", self.path.display())),
        }
    }

    fn persist(&self, blob: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let existed = self.path.exists();
        let mut tmp = NamedTempFile::new_in(self.dir())
            .with_context(|| format!("cannot create temporary file next to {}", self.path.display()))?;
        tmp.write_all(blob.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("cannot replace cookie file {}", self.path.display()))?;

        if !existed {
            log::info!("created cookie file {}", self.path.display());
        }
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("cannot remove cookie file {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCookieStore::new(dir.path().join("cookies.json"));
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn persist_replaces_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCookieStore::new(dir.path().join("cookies.json"));

        store.persist(r#"{"a":{}}"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"a":{}}"#));

        store.persist("{}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{}"));

        // Only the target file remains; temporaries were renamed away.
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCookieStore::new(dir.path().join("cookies.json"));

        store.persist("{}").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCookieStore::new(dir.path().join("nope").join("cookies.json"));
        assert!(store.persist("{}").is_err());
    }
}
