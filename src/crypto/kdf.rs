//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! Two keys come out of this module:
//! - the **master key**, hardened from the vault password, which only
//!   ever encrypts the vault's container;
//! - a **record key** per stored file, hardened from that file's random
//!   secret, which only ever encrypts the file's blob.
//!
//! Both use a fixed, application-wide salt (one label per key kind).
//! The salt is public and identical everywhere, so two vaults sharing a
//! password share a master key.  It adds no secrecy against a known
//! password; the protection comes from the iteration count alone.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::debug;
use zeroize::Zeroize;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Salt for master keys derived from vault passwords.
const MASTER_SALT: &[u8] = b"filevault:master-key:v1";

/// Salt for record keys derived from per-file secrets.
const RECORD_SALT: &[u8] = b"filevault:record-key:v1";

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 480_000;

/// Lowest iteration count accepted from configuration.
pub const MIN_ITERATIONS: u32 = 10_000;

/// Configurable PBKDF2 parameters.
///
/// Mirrors `Settings::kdf_iterations` so the CLI can pass whatever the
/// user configured in `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Number of PBKDF2 rounds (default: 480 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Build params with an explicit iteration count.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(VaultError::KeyDerivation(format!(
                "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        Ok(())
    }
}

/// Derive the master key for a vault password.
///
/// The same password + params always produce the same key.
pub fn derive_master_key(password: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(VaultError::InvalidValue("password cannot be empty".into()));
    }
    debug!(iterations = params.iterations, "deriving master key");
    harden(password, MASTER_SALT, params)
}

/// Derive the key protecting a single file's blob from its record secret.
///
/// Never touches the vault password, so a record key reveals nothing
/// about the master key and vice versa.
pub fn derive_record_key(secret: u128, params: &KdfParams) -> Result<DerivedKey> {
    debug!(iterations = params.iterations, "deriving record key");
    harden(&secret.to_be_bytes(), RECORD_SALT, params)
}

fn harden(input: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(input, salt, params.iterations, &mut key);
    let derived = DerivedKey::new(key);
    key.zeroize();
    Ok(derived)
}
