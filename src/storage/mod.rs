//! Filesystem abstraction used by the vault core.
//!
//! Everything the core touches on disk (containers, blobs, vault roots,
//! plaintext sources and extraction targets) goes through a `Storage`
//! implementation:
//! - `LocalStorage` talks to the real filesystem (`local`).
//! - `MemoryStorage` keeps everything in a map, for tests (`memory`).

pub mod local;
pub mod memory;

use std::path::{Path, PathBuf};

use crate::errors::Result;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Blocking filesystem operations needed by the vault.
///
/// Implementations report a missing path as `VaultError::NotFound` from
/// `read`, `remove` and `file_size`, so callers can tell "absent" apart
/// from other I/O failures.
pub trait Storage: Send + Sync {
    /// Short backend name, for logs.
    fn name(&self) -> &str;

    /// Read a whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace a file's contents in full, creating it if needed.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Delete a single file.
    fn remove(&self, path: &Path) -> Result<()>;

    /// `true` if anything (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Size of a file in bytes.
    fn file_size(&self, path: &Path) -> Result<u64>;

    /// Paths of the direct children of a directory, in no particular order.
    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}
