//! Vault module — encrypted file storage.
//!
//! This module provides:
//! - The explicit `VaultContext` every operation runs against (`context`)
//! - `FileRecord` catalog entries (`record`)
//! - Per-file encrypted blobs (`blob`) and the `VaultFile` entity (`file`)
//! - The encrypted catalog container (`container`)
//! - The high-level `Vault` lifecycle (`store`)

pub mod blob;
pub mod container;
pub mod context;
pub mod file;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use container::{Catalog, ContainerState};
pub use context::VaultContext;
pub use file::VaultFile;
pub use record::FileRecord;
pub use store::{validate_vault_name, BlobFailure, DeleteReport, FileEntry, Vault};
