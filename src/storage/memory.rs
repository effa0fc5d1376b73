//! In-memory storage for testing.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use super::Storage;
use crate::errors::{Result, VaultError};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    /// Writes under any of these prefixes fail with a permission error.
    read_only: Vec<PathBuf>,
}

/// `Storage` that keeps files in a map.
///
/// Paths are used verbatim as keys, so callers should hand it absolute,
/// normalized paths (the vault core always does).  The filesystem root
/// exists from the start; everything else must be created.
#[derive(Debug)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner.dirs.insert(PathBuf::from("/"));
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Make every write below `prefix` fail, to simulate a full or
    /// read-only disk.
    pub fn deny_writes_under(&self, prefix: impl Into<PathBuf>) {
        self.write_lock().read_only.push(prefix.into());
    }

    /// Number of files currently stored directly inside `dir`.
    pub fn count_files_in(&self, dir: &Path) -> usize {
        self.read_lock()
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .count()
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &Path) -> VaultError {
    VaultError::NotFound(path.display().to_string())
}

impl Storage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.read_lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut inner = self.write_lock();

        if inner.read_only.iter().any(|p| path.starts_with(p)) {
            return Err(VaultError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            )));
        }
        if inner.dirs.contains(path) {
            return Err(VaultError::InvalidValue(format!(
                "{} is a directory",
                path.display()
            )));
        }
        match path.parent() {
            Some(parent) if inner.dirs.contains(parent) => {}
            _ => return Err(not_found(path)),
        }

        inner.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut inner = self.write_lock();
        if inner.dirs.contains(path) {
            return Err(VaultError::InvalidValue(format!(
                "{} is a directory",
                path.display()
            )));
        }
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.read_lock().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read_lock().dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut inner = self.write_lock();
        for ancestor in path.ancestors() {
            if inner.files.contains_key(ancestor) {
                return Err(VaultError::InvalidValue(format!(
                    "{} is a file",
                    ancestor.display()
                )));
            }
        }
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            inner.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        self.read_lock()
            .files
            .get(path)
            .map(|data| data.len() as u64)
            .ok_or_else(|| not_found(path))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let inner = self.read_lock();
        if !inner.dirs.contains(path) {
            return Err(not_found(path));
        }
        let files = inner.files.keys();
        let dirs = inner.dirs.iter();
        Ok(files
            .chain(dirs)
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_existing_parent() {
        let storage = MemoryStorage::new();
        let path = Path::new("/vaults/a.vault");

        assert!(storage.write(path, b"x").unwrap_err().is_not_found());

        storage.create_dir_all(Path::new("/vaults")).unwrap();
        storage.write(path, b"x").unwrap();
        assert_eq!(storage.read(path).unwrap(), b"x");
    }

    #[test]
    fn create_dir_all_registers_ancestors() {
        let storage = MemoryStorage::new();
        storage.create_dir_all(Path::new("/a/b/c")).unwrap();

        assert!(storage.is_dir(Path::new("/a")));
        assert!(storage.is_dir(Path::new("/a/b")));
        assert!(storage.is_dir(Path::new("/a/b/c")));
        assert!(!storage.is_file(Path::new("/a/b")));
    }

    #[test]
    fn create_dir_all_refuses_to_shadow_a_file() {
        let storage = MemoryStorage::new();
        storage.create_dir_all(Path::new("/a")).unwrap();
        storage.write(Path::new("/a/f"), b"").unwrap();

        assert!(storage.create_dir_all(Path::new("/a/f/g")).is_err());
    }

    #[test]
    fn deny_writes_under_blocks_only_that_prefix() {
        let storage = MemoryStorage::new();
        storage.create_dir_all(Path::new("/ro")).unwrap();
        storage.create_dir_all(Path::new("/rw")).unwrap();
        storage.deny_writes_under("/ro");

        assert!(matches!(
            storage.write(Path::new("/ro/x"), b"1"),
            Err(VaultError::Io(_))
        ));
        storage.write(Path::new("/rw/x"), b"1").unwrap();
    }

    #[test]
    fn list_dir_returns_direct_children_only() {
        let storage = MemoryStorage::new();
        storage.create_dir_all(Path::new("/d/sub")).unwrap();
        storage.write(Path::new("/d/one"), b"1").unwrap();
        storage.write(Path::new("/d/sub/two"), b"2").unwrap();

        let mut children = storage.list_dir(Path::new("/d")).unwrap();
        children.sort();
        assert_eq!(
            children,
            vec![PathBuf::from("/d/one"), PathBuf::from("/d/sub")]
        );
        assert_eq!(storage.count_files_in(Path::new("/d")), 1);
    }
}
