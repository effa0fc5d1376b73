//! Local filesystem storage.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::Storage;
use crate::errors::{Result, VaultError};

/// `Storage` backed by `std::fs`.
///
/// Writes go to a temp file next to the target which is then renamed
/// over it, so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

/// Turn `ErrorKind::NotFound` into the vault's own `NotFound`.
fn map_io(path: &Path, err: std::io::Error) -> VaultError {
    if err.kind() == ErrorKind::NotFound {
        VaultError::NotFound(path.display().to_string())
    } else {
        VaultError::Io(err)
    }
}

/// Create `path` fresh (mode 0600 on Unix) and write `data` to it.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    // A temp file left by a crash may have other permissions.
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

impl Storage for LocalStorage {
    fn name(&self) -> &str {
        "local"
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| map_io(path, e))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        // The temp file is in the same directory so rename is atomic on
        // the same filesystem.
        let parent = path.parent().unwrap_or(Path::new("."));
        let tmp_path = parent.join(format!(
            ".{}.tmp",
            path.file_name().unwrap_or_default().to_string_lossy()
        ));

        if let Err(e) = write_private(&tmp_path, data).and_then(|()| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(map_io(path, e));
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return Err(VaultError::InvalidValue(format!(
                "{} is a directory",
                path.display()
            )));
        }
        fs::remove_file(path).map_err(|e| map_io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let meta = fs::metadata(path).map_err(|e| map_io(path, e))?;
        Ok(meta.len())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| map_io(path, e))? {
            children.push(entry?.path());
        }
        Ok(children)
    }
}
