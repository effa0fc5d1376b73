use thiserror::Error;

/// All errors that can occur in FileVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Lookup errors ---
    /// A container, blob, or catalog entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    // --- Crypto errors ---
    /// Wrong key or tampered/corrupted ciphertext.  The two causes are
    /// deliberately reported the same way.
    #[error("Authentication failed: wrong password or corrupted data")]
    Authentication,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // --- Vault errors ---
    /// Decrypted payload is not a well-formed container.
    #[error("Invalid vault format: {0}")]
    Format(String),

    /// The entity lacks transient data the operation needs.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A precondition on an argument was violated.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    Audit(String),
}

impl VaultError {
    /// `true` for the error raised when a lookup target is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound(_))
    }
}

/// Convenience type alias for FileVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
