//! The file entity handed to the presentation layer.

use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use super::blob;
use super::context::VaultContext;
use super::record::FileRecord;
use crate::errors::{Result, VaultError};

/// A logical file: its catalog name, its record, and (for files not yet
/// stored) the live source it will be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    filename: String,
    record: FileRecord,
    source: Option<PathBuf>,
}

impl VaultFile {
    /// Stat a live file at `path` and mint a fresh record for it.
    ///
    /// The logical filename is the last path component.
    pub fn new(ctx: &VaultContext, path: &Path) -> Result<Self> {
        let storage = ctx.storage();

        if !storage.exists(path) {
            return Err(VaultError::NotFound(format!("file {}", path.display())));
        }
        if storage.is_dir(path) {
            return Err(VaultError::InvalidValue(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                VaultError::InvalidValue(format!("{} has no usable file name", path.display()))
            })?
            .to_string();

        let size = storage.file_size(path)?;

        Ok(Self {
            filename,
            record: FileRecord::generate(size),
            source: Some(path.to_path_buf()),
        })
    }

    /// Rebuild a file from its catalog entry.  It has no source, so it
    /// can be read or deleted but not saved.
    pub fn from_record(filename: impl Into<String>, record: FileRecord) -> Self {
        Self {
            filename: filename.into(),
            record,
            source: None,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn size(&self) -> u64 {
        self.record.size
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Read the source and write it, encrypted, as a blob under `root`.
    pub fn save(&self, ctx: &VaultContext, root: &Path) -> Result<()> {
        let source = self.source.as_deref().ok_or_else(|| {
            VaultError::InvalidState(format!(
                "{} was loaded from a vault and has no source to save",
                self.filename
            ))
        })?;

        let plaintext = Zeroizing::new(ctx.storage().read(source)?);
        blob::write(ctx, root, &self.record, &plaintext)?;
        debug!(file = %self.filename, id = %self.record.id, "saved file");
        Ok(())
    }

    /// Decrypt the stored blob.
    pub fn read(&self, ctx: &VaultContext, root: &Path) -> Result<Zeroizing<Vec<u8>>> {
        blob::read(ctx, root, &self.record)
    }

    /// Decrypt the stored blob into a new file at `output`.
    pub fn open_into(&self, ctx: &VaultContext, root: &Path, output: &Path) -> Result<()> {
        if ctx.storage().exists(output) {
            return Err(VaultError::InvalidValue(format!(
                "output {} already exists",
                output.display()
            )));
        }

        let plaintext = self.read(ctx, root)?;
        ctx.storage().write(output, &plaintext)?;
        debug!(file = %self.filename, output = %output.display(), "extracted file");
        Ok(())
    }

    /// Remove the stored blob.
    pub fn delete_file(&self, ctx: &VaultContext, root: &Path) -> Result<()> {
        blob::remove(ctx, root, &self.record)
    }
}
