//! Encrypted catalog container.
//!
//! One container per vault, at `<config dir>/<name>.vault`.  The file
//! holds nothing but an envelope; its plaintext is this JSON document:
//!
//! ```text
//! { "name": "...", "root": "/abs/path",
//!   "data": { "<filename>": { "id": "...", "secret": 123, "size": 3 }, ... } }
//! ```
//!
//! Every save serializes and rewrites the whole document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::record::FileRecord;
use crate::crypto::{decrypt, encrypt, DerivedKey};
use crate::errors::{Result, VaultError};
use crate::storage::Storage;

/// Logical filename -> record.  A `BTreeMap` so serialization is
/// deterministic.
pub type Catalog = BTreeMap<String, FileRecord>;

/// Plaintext payload of a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerState {
    pub name: String,

    /// Absolute, normalized directory holding the vault's blobs.
    pub root: PathBuf,

    #[serde(rename = "data")]
    pub catalog: Catalog,
}

/// Canonical JSON encoding of `state`.
///
/// The output contains every record secret, so it is handed back in a
/// buffer that wipes itself.
pub fn serialize(state: &ContainerState) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(state)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::Serialization(format!("container: {e}")))
}

/// Encrypt `state` with the master key and replace the container at
/// `location` in full.
pub fn persist(
    storage: &dyn Storage,
    location: &Path,
    key: &DerivedKey,
    state: &ContainerState,
) -> Result<()> {
    let plaintext = serialize(state)?;
    let ciphertext = encrypt(key.as_bytes(), &plaintext)?;

    if let Some(parent) = location.parent() {
        if !storage.is_dir(parent) {
            storage.create_dir_all(parent)?;
        }
    }

    storage.write(location, &ciphertext)?;
    debug!(
        vault = %state.name,
        files = state.catalog.len(),
        bytes = ciphertext.len(),
        "persisted container"
    );
    Ok(())
}

/// Read, decrypt and parse the container at `location`.
///
/// - `NotFound` if there is no container.
/// - `Authentication` on a wrong key or a damaged file.
/// - `Format` if the plaintext is not a valid container document.
pub fn load(storage: &dyn Storage, location: &Path, key: &DerivedKey) -> Result<ContainerState> {
    let ciphertext = storage.read(location).map_err(|e| {
        if e.is_not_found() {
            VaultError::NotFound(format!("vault container {}", location.display()))
        } else {
            e
        }
    })?;

    let plaintext = Zeroizing::new(decrypt(key.as_bytes(), &ciphertext)?);

    let state: ContainerState = serde_json::from_slice(&plaintext)
        .map_err(|e| VaultError::Format(format!("container JSON: {e}")))?;

    if !state.root.is_absolute() {
        return Err(VaultError::Format(format!(
            "container root {} is not absolute",
            state.root.display()
        )));
    }

    debug!(vault = %state.name, files = state.catalog.len(), "loaded container");
    Ok(state)
}
