//! Audit log — SQLite-based operation history.
//!
//! Keeps a record of vault operations (vault-new, file-add, file-get,
//! file-delete, vault-delete) in a local SQLite database at
//! `<config_root>/audit.db`.  Filenames and vault names are logged;
//! file contents, secrets and passwords never are.
//!
//! If the database can't be opened or written to, operations continue
//! without logging.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{Result, VaultError};

/// File name of the audit database inside the config root.
pub const AUDIT_DB_NAME: &str = "audit.db";

/// A single audit log entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub vault: String,
    pub filename: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database in `config_root`.
    ///
    /// Returns `None` if the database can't be opened; callers treat
    /// that as "audit logging unavailable" and carry on.
    pub fn open(config_root: &Path) -> Option<Self> {
        let db_path = Self::db_path(config_root);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(e) => {
                debug!(path = %db_path.display(), error = %e, "audit log unavailable");
                return None;
            }
        };

        // Owner-only, like the containers.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp  TEXT NOT NULL,
                operation  TEXT NOT NULL,
                vault      TEXT NOT NULL,
                filename   TEXT,
                details    TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation.  Errors are ignored.
    pub fn log(&self, operation: &str, vault: &str, filename: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, vault, filename, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, vault, filename, details],
        ) {
            debug!(operation, error = %e, "could not write audit entry");
        }
    }

    /// Query recent audit entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, vault, filename, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, vault, filename, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| VaultError::Audit(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    vault: row.get(3)?,
                    filename: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| VaultError::Audit(format!("query exec: {e}")))?;

        rows.map(|row| row.map_err(|e| VaultError::Audit(format!("row parse: {e}"))))
            .collect()
    }

    /// Path of the audit database inside `config_root`.
    pub fn db_path(config_root: &Path) -> PathBuf {
        config_root.join(AUDIT_DB_NAME)
    }
}
