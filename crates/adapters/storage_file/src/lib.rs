//! # zonehub-adapter-storage-file
//!
//! JSON file persistence adapter.
//!
//! ## Responsibilities
//! - Implement the `Section` port defined in `zonehub-app::ports::section`
//! - Load the whole section tree from one JSON document at startup
//! - Rewrite the document after every mutation that changes it (synced temp
//!   file, then rename, so a crash never leaves a half-written file behind)
//!
//! ## Dependency rule
//! Depends on `zonehub-app` (for the port trait) and `zonehub-domain` (for the
//! tree type). The `app` and `domain` crates must never reference this adapter.

pub mod error;

use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use zonehub_app::ports::Section;
use zonehub_app::section::MemorySection;
use zonehub_domain::section::{SectionTree, Value};

use crate::error::StorageError;

/// Section handle backed by a JSON file.
///
/// All handles opened from the same [`FileSection::open`] call share one tree
/// and one file.
#[derive(Debug, Clone)]
pub struct FileSection {
    inner: MemorySection,
    file: Arc<Mutex<PathBuf>>,
}

impl FileSection {
    /// Open the document at `path` and return its root section.
    ///
    /// A missing file yields an empty tree; the file is created on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let tree = load(&path)?;
        tracing::info!(path = %path.display(), "state file opened");
        Ok(Self {
            inner: MemorySection::from_tree(tree),
            file: Arc::new(Mutex::new(path)),
        })
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `mutation` and flush the resulting tree.
    ///
    /// The file lock is held across both steps so concurrent writers flush in
    /// the order they mutated.
    fn mutate<T>(&self, mutation: impl FnOnce(&MemorySection) -> T) -> T {
        let path = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        let result = mutation(&self.inner);
        if let Err(err) = store(&path, &self.inner.snapshot()) {
            tracing::error!(error = %err, "unable to persist state");
        }
        result
    }
}

impl Section for FileSection {
    fn section(&self, key: &str) -> Self {
        Self {
            inner: self.inner.section(key),
            file: Arc::clone(&self.file),
        }
    }

    fn section_keys(&self) -> Vec<String> {
        self.inner.section_keys()
    }

    fn section_exists(&self, key: &str) -> bool {
        self.inner.section_exists(key)
    }

    fn section_delete(&self, key: &str) -> bool {
        self.mutate(|inner| inner.section_delete(key))
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn set(&self, key: &str, value: Value) {
        if self.inner.value(key).as_ref() == Some(&value) {
            return;
        }
        self.mutate(|inner| inner.set(key, value));
    }

    fn string(&self, key: &str) -> Option<String> {
        self.inner.string(key)
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.inner.int(key)
    }

    fn delete(&self, key: &str) -> bool {
        self.mutate(|inner| inner.delete(key))
    }
}

fn load(path: &Path) -> Result<SectionTree, StorageError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(SectionTree::default());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn store(path: &Path, tree: &SectionTree) -> Result<(), StorageError> {
    let io_error = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = serde_json::to_vec_pretty(tree).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut temp = OsString::from(path.as_os_str());
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = File::create(&temp).map_err(io_error)?;
    file.write_all(&bytes).map_err(io_error)?;
    file.sync_all().map_err(io_error)?;
    drop(file);
    std::fs::rename(&temp, path).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempPath(PathBuf);

    impl TempPath {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("zonehub-{}.json", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn should_start_empty_when_file_is_missing() {
        let temp = TempPath::new();
        let root = FileSection::open(&temp.0).unwrap();
        assert!(root.section_keys().is_empty());
        assert!(!temp.0.exists());
    }

    #[test]
    fn should_persist_writes_across_reopen() {
        let temp = TempPath::new();
        {
            let root = FileSection::open(&temp.0).unwrap();
            let zone = root.section("Zones").section("1");
            zone.set("Name", Value::from("Kitchen"));
            zone.set("ParentZone", Value::from(0));
            root.section("Zones").set("NextZoneId", Value::from(2));
        }

        let reopened = FileSection::open(&temp.0).unwrap();
        let zones = reopened.section("Zones");
        assert_eq!(zones.int("NextZoneId"), Some(2));
        assert_eq!(zones.section("1").string("Name").as_deref(), Some("Kitchen"));
        assert_eq!(zones.section("1").int("ParentZone"), Some(0));
    }

    #[test]
    fn should_persist_deletions() {
        let temp = TempPath::new();
        let root = FileSection::open(&temp.0).unwrap();
        root.section("Devices").section("lamp").set("Name", Value::from("Lamp"));
        root.section("Devices").section("plug").set("Name", Value::from("Plug"));
        assert!(root.section("Devices").section_delete("lamp"));

        let reopened = FileSection::open(&temp.0).unwrap();
        assert_eq!(
            reopened.section("Devices").section_keys(),
            vec!["plug".to_string()]
        );
    }

    #[test]
    fn should_not_leave_temp_file_behind() {
        let temp = TempPath::new();
        let root = FileSection::open(&temp.0).unwrap();
        root.set("Version", Value::from(1));

        let mut leftover = OsString::from(temp.0.as_os_str());
        leftover.push(".tmp");
        assert!(temp.0.exists());
        assert!(!PathBuf::from(leftover).exists());
    }

    #[test]
    fn should_skip_rewrite_when_value_is_unchanged() {
        let temp = TempPath::new();
        let root = FileSection::open(&temp.0).unwrap();
        let zone = root.section("Zones").section("1");
        zone.set("OrderAfter", Value::from(0));
        std::fs::remove_file(&temp.0).unwrap();

        zone.set("OrderAfter", Value::from(0));
        assert!(!temp.0.exists());

        zone.set("OrderAfter", Value::from(2));
        let reopened = FileSection::open(&temp.0).unwrap();
        assert_eq!(reopened.section("Zones").section("1").int("OrderAfter"), Some(2));
    }

    #[test]
    fn should_reject_malformed_document() {
        let temp = TempPath::new();
        std::fs::write(&temp.0, b"{ not json").unwrap();

        let result = FileSection::open(&temp.0);
        assert!(matches!(result, Err(StorageError::Json { .. })));
    }

    #[test]
    fn should_expose_backing_path() {
        let temp = TempPath::new();
        let root = FileSection::open(&temp.0).unwrap();
        assert_eq!(root.section("Zones").path(), temp.0);
    }
}
