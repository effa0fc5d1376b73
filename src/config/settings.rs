use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::errors::{Result, VaultError};

/// Name of the per-user directory that holds vault containers.
pub const CONFIG_DIR_NAME: &str = ".vault";

/// User-level configuration, loaded from `<config root>/config.toml`.
///
/// Every field has a sensible default so FileVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// PBKDF2 iteration count for master and record keys (default: 480 000).
    ///
    /// Changing this makes existing vaults and blobs unreadable until it
    /// is changed back.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Vault used by `file` commands when `--vault` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vault: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            default_vault: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the config root.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<config_root>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_root: &Path) -> Result<Self> {
        let config_path = config_root.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams::with_iterations(self.kdf_iterations)
    }
}

/// Work out where vault containers live and make sure the directory exists.
///
/// `base` comes from `--config-dir` / `VAULT_CONFIG_DIR`; when given it
/// must already exist.  Without it the user's home directory is used.
/// Either way the containers go in a `.vault` folder inside the base.
pub fn resolve_config_root(base: Option<&Path>) -> Result<PathBuf> {
    let base = match base {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(VaultError::Config(format!(
                    "configured config directory does not exist: {}",
                    dir.display()
                )));
            }
            dir.to_path_buf()
        }
        None => dirs::home_dir().ok_or_else(|| {
            VaultError::Config("cannot determine the home directory".into())
        })?,
    };

    let root = base.join(CONFIG_DIR_NAME);
    if !root.exists() {
        std::fs::create_dir_all(&root)?;
    }
    Ok(root)
}

// ── Tests ────────────────────────────────────────────────────────────
