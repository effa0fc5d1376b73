//! In-memory key material.
//!
//! Both the master key and the per-record keys are 32 bytes and are
//! held in a `DerivedKey`, which wipes itself when dropped.

use zeroize::Zeroize;

/// Length of every derived key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that automatically zeroes its memory when
/// dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(mut bytes: [u8; KEY_LEN]) -> Self {
        let key = Self { bytes };
        bytes.zeroize();
        key
    }

    /// Access the raw key bytes (e.g. to pass to `encrypt`).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}
