//! File-backed notification store.
//!
//! Each scope maps to one JSON file under the store root (see [`StoreScope::relative_path`]).
//! Writes go to a sibling temporary file that is then renamed over the slot, so a crash mid-write
//! leaves either the previous list or the new one, never a truncated file.

use crate::{decode, encode_capped, NotificationStore, StoreError, StoreResult, StoreScope};
use notify_types::Notification;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores notification lists as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct FileNotificationStore {
    root_directory: PathBuf,
}

impl FileNotificationStore {
    /// Creates a store rooted at `root_directory`, creating the directory if missing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created (I/O)
    pub fn new(root_directory: &Path) -> StoreResult<Self> {
        if root_directory.exists() && !root_directory.is_dir() {
            return Err(StoreError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        fs::create_dir_all(root_directory).map_err(|e| {
            StoreError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create store directory {}: {}",
                    root_directory.display(),
                    e
                ),
            ))
        })?;

        Ok(Self {
            root_directory: root_directory.to_path_buf(),
        })
    }

    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Absolute path of the slot for `scope`.
    pub fn slot_path(&self, scope: &StoreScope) -> PathBuf {
        self.root_directory.join(scope.relative_path())
    }
}

impl NotificationStore for FileNotificationStore {
    fn load(&self, scope: &StoreScope) -> StoreResult<Option<Vec<Notification>>> {
        let path = self.slot_path(scope);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        decode(&path.display().to_string(), &bytes).map(Some)
    }

    fn save(&self, scope: &StoreScope, notifications: &[Notification]) -> StoreResult<()> {
        let path = self.slot_path(scope);
        let bytes = encode_capped(notifications)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(
            "saved {} notification(s) to {}",
            notifications.len().min(crate::MAX_STORED_NOTIFICATIONS),
            path.display()
        );
        Ok(())
    }

    fn clear(&self, scope: &StoreScope) -> StoreResult<()> {
        let path = self.slot_path(scope);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::notifications;
    use crate::MAX_STORED_NOTIFICATIONS;
    use notify_types::NonEmptyText;
    use tempfile::TempDir;

    fn identity(id: &str) -> StoreScope {
        StoreScope::for_identity(&NonEmptyText::new(id).unwrap())
    }

    #[test]
    fn test_new_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("data");

        let store = FileNotificationStore::new(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root_directory(), root.as_path());
    }

    #[test]
    fn test_new_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("file.txt");
        fs::write(&root, "not a directory").unwrap();

        let result = FileNotificationStore::new(&root);

        assert!(matches!(result, Err(StoreError::InvalidRootDirectory(_))));
    }

    #[test]
    fn test_load_missing_slot_is_none() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();

        assert!(store.load(&identity("a1")).unwrap().is_none());
        assert!(store.load(&StoreScope::Deployment).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_reproduces_list() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();
        let scope = identity("a1");
        let list = notifications(5);

        store.save(&scope, &list).unwrap();
        let loaded = store.load(&scope).unwrap().unwrap();

        assert_eq!(loaded, list);
        assert!(store.slot_path(&scope).is_file());
        assert!(!store.slot_path(&scope).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_truncates_to_cap_keeping_newest() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();
        let list = notifications(MAX_STORED_NOTIFICATIONS + 7);

        store.save(&StoreScope::Deployment, &list).unwrap();
        let loaded = store.load(&StoreScope::Deployment).unwrap().unwrap();

        assert_eq!(loaded.len(), MAX_STORED_NOTIFICATIONS);
        assert_eq!(loaded[..], list[..MAX_STORED_NOTIFICATIONS]);
    }

    #[test]
    fn test_identity_slots_are_isolated() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();

        store.save(&identity("a1"), &notifications(3)).unwrap();

        assert!(store.load(&identity("a2")).unwrap().is_none());
        assert_eq!(store.load(&identity("a1")).unwrap().unwrap().len(), 3);
    }

    #[test]
    fn test_corrupt_slot_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();
        let scope = identity("a1");
        let path = store.slot_path(&scope);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();

        let result = store.load(&scope);

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_clear_removes_slot_and_tolerates_missing() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();
        let scope = identity("a1");

        store.save(&scope, &notifications(2)).unwrap();
        store.clear(&scope).unwrap();

        assert!(store.load(&scope).unwrap().is_none());
        store.clear(&scope).unwrap();
    }

    #[test]
    fn test_save_empty_list_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileNotificationStore::new(temp.path()).unwrap();

        store.save(&StoreScope::Deployment, &[]).unwrap();

        assert_eq!(
            store.load(&StoreScope::Deployment).unwrap(),
            Some(Vec::new())
        );
    }
}
