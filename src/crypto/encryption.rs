//! AES-256-GCM authenticated envelope.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! leading version byte is fed to GCM as associated data, so the tag
//! authenticates header, nonce and ciphertext together.
//!
//! Layout of the returned byte buffer:
//!   [ 1-byte version | 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

/// Envelope format version written by this build.
pub const ENVELOPE_VERSION: u8 = 0x01;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Version byte + nonce.
const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Smallest possible envelope (empty plaintext).
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + TAG_LEN;

/// Encrypt `plaintext` with a 32-byte `key`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::Encryption(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let header = [ENVELOPE_VERSION];

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| VaultError::Encryption(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    output.extend_from_slice(&header);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt an envelope produced by `encrypt`.
///
/// Every failure (short input, unknown version, wrong key, flipped bit)
/// collapses into `VaultError::Authentication`; no plaintext is ever
/// returned unless the tag verifies.
pub fn decrypt(key: &[u8], envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() < MIN_ENVELOPE_LEN {
        return Err(VaultError::Authentication);
    }

    let (header, rest) = envelope.split_at(1);
    if header[0] != ENVELOPE_VERSION {
        return Err(VaultError::Authentication);
    }

    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::Authentication)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| VaultError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_starts_with_version_byte() {
        let ct = encrypt(&[0x01; 32], b"abc").unwrap();
        assert_eq!(ct[0], ENVELOPE_VERSION);
        assert_eq!(ct.len(), MIN_ENVELOPE_LEN + 3);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let key = [0x02; 32];
        let ct = encrypt(&key, b"").unwrap();
        assert_eq!(ct.len(), MIN_ENVELOPE_LEN);
        assert!(decrypt(&key, &ct).unwrap().is_empty());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let key = [0x03; 32];
        let mut ct = encrypt(&key, b"payload").unwrap();
        ct[0] = 0x02;
        assert!(matches!(decrypt(&key, &ct), Err(VaultError::Authentication)));
    }

    #[test]
    fn encrypt_rejects_short_key() {
        let result = encrypt(&[0u8; 16], b"data");
        assert!(matches!(result, Err(VaultError::Encryption(_))));
    }

    #[test]
    fn decrypt_with_short_key_fails_closed() {
        let ct = encrypt(&[0x04; 32], b"data").unwrap();
        assert!(matches!(
            decrypt(&[0x04; 16], &ct),
            Err(VaultError::Authentication)
        ));
    }
}
