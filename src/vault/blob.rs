//! Per-file encrypted blobs.
//!
//! A blob is the envelope-encrypted content of one stored file, kept at
//! `<root>/<record id>.blob` and keyed by a key derived from the
//! record's secret.  Payloads are buffered whole; there is no streaming.

use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use super::context::VaultContext;
use super::record::FileRecord;
use crate::crypto::{decrypt, derive_record_key, encrypt};
use crate::errors::{Result, VaultError};

/// Location of `record`'s blob inside `root`.
pub fn blob_path(root: &Path, record: &FileRecord) -> PathBuf {
    root.join(record.blob_file_name())
}

/// Encrypt `plaintext` under the record key and write it to the blob.
pub fn write(ctx: &VaultContext, root: &Path, record: &FileRecord, plaintext: &[u8]) -> Result<()> {
    let key = derive_record_key(record.secret, ctx.kdf_params())?;
    let ciphertext = encrypt(key.as_bytes(), plaintext)?;

    let path = blob_path(root, record);
    ctx.storage().write(&path, &ciphertext)?;
    debug!(id = %record.id, bytes = plaintext.len(), "wrote blob");
    Ok(())
}

/// Read and decrypt the blob for `record`.
///
/// Fails with `NotFound` if the blob is missing and `Authentication` if
/// it does not decrypt under the record key.
pub fn read(ctx: &VaultContext, root: &Path, record: &FileRecord) -> Result<Zeroizing<Vec<u8>>> {
    let path = blob_path(root, record);
    let ciphertext = ctx.storage().read(&path).map_err(|e| missing_blob(e, record))?;

    let key = derive_record_key(record.secret, ctx.kdf_params())?;
    let plaintext = decrypt(key.as_bytes(), &ciphertext)?;
    debug!(id = %record.id, bytes = plaintext.len(), "read blob");
    Ok(Zeroizing::new(plaintext))
}

/// Delete the blob for `record`.  Fails with `NotFound` if it is absent.
pub fn remove(ctx: &VaultContext, root: &Path, record: &FileRecord) -> Result<()> {
    let path = blob_path(root, record);
    ctx.storage()
        .remove(&path)
        .map_err(|e| missing_blob(e, record))?;
    debug!(id = %record.id, "removed blob");
    Ok(())
}

fn missing_blob(err: VaultError, record: &FileRecord) -> VaultError {
    if err.is_not_found() {
        VaultError::NotFound(format!("blob {}", record.blob_file_name()))
    } else {
        err
    }
}
