//! Catalog entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extension of the per-file encrypted blobs.
pub const BLOB_EXT: &str = "blob";

/// One stored file, as recorded in the vault catalog.
///
/// The record never holds key material directly: the blob key is
/// re-derived from `secret` whenever the blob is read or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Opaque identifier; also names the blob (`<id>.blob`).
    pub id: String,

    /// Random value the blob key is derived from.  Fresh per record.
    pub secret: u128,

    /// Plaintext length in bytes, for display only.
    pub size: u64,
}

impl FileRecord {
    /// A brand-new record with a fresh id and secret.
    pub fn generate(size: u64) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            secret: rand::random::<u128>(),
            size,
        }
    }

    /// File name of this record's blob inside the vault root.
    pub fn blob_file_name(&self) -> String {
        format!("{}.{BLOB_EXT}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_records_are_unique() {
        let a = FileRecord::generate(10);
        let b = FileRecord::generate(10);
        assert_ne!(a.id, b.id);
        assert_ne!(a.secret, b.secret);
        assert_eq!(a.id.len(), 32);
    }

    #[test]
    fn blob_file_name_uses_id() {
        let record = FileRecord {
            id: "abc123".into(),
            secret: 7,
            size: 3,
        };
        assert_eq!(record.blob_file_name(), "abc123.blob");
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let record = FileRecord {
            id: "f00d".into(),
            secret: 340_282_366_920_938_463_463_374_607_431_768_211_455,
            size: 3,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"f00d","secret":340282366920938463463374607431768211455,"size":3}"#
        );

        let back: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
