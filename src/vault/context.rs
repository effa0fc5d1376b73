//! Explicit environment handed to every vault operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::crypto::KdfParams;
use crate::errors::Result;
use crate::storage::{LocalStorage, Storage};

/// File extension of vault containers.
pub const CONTAINER_EXT: &str = "vault";

/// Where containers live, how keys are hardened, and which filesystem
/// to use.
///
/// Nothing in the vault core reads global state: tests point a context
/// at a temp dir (or a `MemoryStorage`) and get full isolation.
/// Cloning is cheap; the storage is shared.
#[derive(Clone)]
pub struct VaultContext {
    config_dir: PathBuf,
    kdf: KdfParams,
    storage: Arc<dyn Storage>,
}

impl VaultContext {
    /// A context on the local filesystem with default KDF params.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            kdf: KdfParams::default(),
            storage: Arc::new(LocalStorage::new()),
        }
    }

    /// A local-filesystem context using the KDF params from `settings`.
    pub fn from_settings(config_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self::new(config_dir).with_kdf_params(settings.kdf_params())
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_kdf_params(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Directory holding the `<name>.vault` containers.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Path of the container for vault `name`.
    pub fn container_path(&self, name: &str) -> PathBuf {
        self.config_dir.join(format!("{name}.{CONTAINER_EXT}"))
    }

    /// `true` if a container for `name` is on disk.
    pub fn vault_exists(&self, name: &str) -> bool {
        self.storage.is_file(&self.container_path(name))
    }

    /// Names of every vault with a container in the config dir, sorted.
    ///
    /// Metadata-only: nothing is decrypted and no password is needed.
    pub fn list_vaults(&self) -> Result<Vec<String>> {
        if !self.storage.is_dir(&self.config_dir) {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = self
            .storage
            .list_dir(&self.config_dir)?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == CONTAINER_EXT))
            .filter(|p| self.storage.is_file(p))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
            .collect();

        names.sort();
        Ok(names)
    }
}

impl std::fmt::Debug for VaultContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultContext")
            .field("config_dir", &self.config_dir)
            .field("kdf", &self.kdf)
            .field("storage", &self.storage.name())
            .finish()
    }
}
