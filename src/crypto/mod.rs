//! Cryptographic primitives for FileVault.
//!
//! This module provides:
//! - AES-256-GCM envelope encryption and decryption (`encryption`)
//! - PBKDF2 master-key and record-key derivation (`kdf`)
//! - The zeroize-on-drop key wrapper (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_key, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_master_key, derive_record_key, KdfParams};
pub use keys::DerivedKey;
