//! `filevault tools` — standalone helpers that need no vault.
//!
//! Keys are 32 random bytes shown as 64 hex characters.  Text tokens are
//! base64-encoded envelopes; encrypted files hold the raw envelope.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::cli::ToolsAction;
use crate::crypto::{decrypt, encrypt};
use crate::errors::{Result, VaultError};
use crate::storage::{LocalStorage, Storage};

/// Length of a tool key in bytes.
pub const KEY_LEN: usize = 32;

/// Execute one `tools` subcommand.
pub fn execute(action: &ToolsAction) -> Result<()> {
    match action {
        ToolsAction::Uuid { number } => {
            for id in random_uuids(*number) {
                println!("{id}");
            }
        }
        ToolsAction::EncryptionKey => println!("{}", generate_key().as_str()),
        ToolsAction::EncryptText {
            input,
            encryption_key,
        } => {
            let key = parse_key(encryption_key)?;
            println!("{}", encrypt_text(&key, input)?);
        }
        ToolsAction::DecryptText {
            input,
            encryption_key,
        } => {
            let key = parse_key(encryption_key)?;
            println!("{}", decrypt_text(&key, input)?.as_str());
        }
        ToolsAction::EncryptFile {
            path,
            encryption_key,
            output,
        } => {
            let key = parse_key(encryption_key)?;
            let written = encrypt_file(&LocalStorage::new(), path, &key, output.as_deref())?;
            println!("{}", written.display());
        }
        ToolsAction::DecryptFile {
            path,
            encryption_key,
            output,
        } => {
            let key = parse_key(encryption_key)?;
            decrypt_file(&LocalStorage::new(), path, &key, output)?;
            println!("{}", output.display());
        }
    }
    Ok(())
}

pub fn random_uuids(count: usize) -> Vec<String> {
    (0..count).map(|_| Uuid::new_v4().to_string()).collect()
}

/// A fresh random key, hex-encoded.
pub fn generate_key() -> Zeroizing<String> {
    let key = Zeroizing::new(rand::random::<[u8; KEY_LEN]>());
    Zeroizing::new(hex::encode(&key[..]))
}

/// Decode a hex key produced by `generate_key`.
pub fn parse_key(encoded: &str) -> Result<Zeroizing<Vec<u8>>> {
    let key = Zeroizing::new(
        hex::decode(encoded.trim())
            .map_err(|_| VaultError::InvalidValue("encryption key is not valid hex".into()))?,
    );
    if key.len() != KEY_LEN {
        return Err(VaultError::InvalidValue(format!(
            "encryption key must be {} hex characters",
            KEY_LEN * 2
        )));
    }
    Ok(key)
}

pub fn encrypt_text(key: &[u8], text: &str) -> Result<String> {
    Ok(BASE64.encode(encrypt(key, text.as_bytes())?))
}

pub fn decrypt_text(key: &[u8], token: &str) -> Result<Zeroizing<String>> {
    let envelope = BASE64
        .decode(token.trim())
        .map_err(|_| VaultError::Authentication)?;
    let plaintext = decrypt(key, &envelope)?;
    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::Format("decrypted text is not UTF-8".into()))
}

/// Encrypt `path` into `output`, or `<path>.enc` when no output is given.
/// Returns the path written.
pub fn encrypt_file(
    storage: &dyn Storage,
    path: &Path,
    key: &[u8],
    output: Option<&Path>,
) -> Result<PathBuf> {
    let output = match output {
        Some(out) => out.to_path_buf(),
        None => default_encrypted_path(path)?,
    };
    refuse_existing(storage, &output)?;

    let plaintext = Zeroizing::new(storage.read(path)?);
    storage.write(&output, &encrypt(key, &plaintext)?)?;
    debug!(input = %path.display(), output = %output.display(), "encrypted file");
    Ok(output)
}

pub fn decrypt_file(storage: &dyn Storage, path: &Path, key: &[u8], output: &Path) -> Result<()> {
    refuse_existing(storage, output)?;

    let envelope = storage.read(path)?;
    let plaintext = Zeroizing::new(decrypt(key, &envelope)?);
    storage.write(output, &plaintext)?;
    debug!(input = %path.display(), output = %output.display(), "decrypted file");
    Ok(())
}

fn default_encrypted_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        VaultError::InvalidValue(format!("{} has no file name", path.display()))
    })?;
    let mut name = name.to_os_string();
    name.push(".enc");
    Ok(path.with_file_name(name))
}

fn refuse_existing(storage: &dyn Storage, output: &Path) -> Result<()> {
    if storage.exists(output) {
        return Err(VaultError::InvalidValue(format!(
            "output {} already exists",
            output.display()
        )));
    }
    Ok(())
}
