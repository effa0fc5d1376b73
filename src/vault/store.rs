//! Vault lifecycle: create, open, add, get, remove and delete.
//!
//! `Vault` ties the container (catalog) and the per-file blobs together
//! so the CLI can work with calls like `vault.add_file(&file)`.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{derive_master_key, DerivedKey};
use crate::errors::{Result, VaultError};

use super::container::{self, Catalog, ContainerState};
use super::context::VaultContext;
use super::file::VaultFile;

/// Longest accepted vault name.
pub const MAX_NAME_LEN: usize = 64;

/// An open vault.  Create one with `Vault::new` or `Vault::open`.
///
/// The master key is derived once and kept for the whole session; the
/// password itself is never stored.
pub struct Vault {
    ctx: VaultContext,
    name: String,
    root: PathBuf,
    catalog: Catalog,
    master_key: DerivedKey,
}

/// Catalog listing row.  Nothing is decrypted to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub filename: String,
    pub id: String,
    pub size: u64,
}

/// A blob `delete` could not remove.
#[derive(Debug, Clone, Serialize)]
pub struct BlobFailure {
    pub filename: String,
    pub error: String,
}

/// Outcome of `Vault::delete`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    /// Blobs removed.
    pub removed: usize,
    pub failures: Vec<BlobFailure>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a new, empty vault called `name` whose blobs live in `root`.
    ///
    /// Does not check for an existing vault of the same name; an existing
    /// container is overwritten.  Callers decide whether that is allowed.
    pub fn new(ctx: &VaultContext, name: &str, root: &Path, password: &[u8]) -> Result<Self> {
        validate_vault_name(name)?;

        // Bad passwords and KDF settings must fail before anything is created.
        let master_key = derive_master_key(password, ctx.kdf_params())?;

        let root = normalize_root(root)?;
        let storage = ctx.storage();
        if storage.is_file(&root) {
            return Err(VaultError::InvalidValue(format!(
                "vault root {} is a file, not a directory",
                root.display()
            )));
        }
        if !storage.is_dir(&root) {
            storage.create_dir_all(&root)?;
            debug!(root = %root.display(), "created vault root");
        }

        let vault = Self {
            ctx: ctx.clone(),
            name: name.to_string(),
            root,
            catalog: Catalog::new(),
            master_key,
        };
        vault.save()?;

        info!(vault = %vault.name, root = %vault.root.display(), "created vault");
        Ok(vault)
    }

    /// Open the existing vault `name`.
    ///
    /// Fails with `NotFound` if there is no container and with
    /// `Authentication` if the password is wrong.
    pub fn open(ctx: &VaultContext, name: &str, password: &[u8]) -> Result<Self> {
        validate_vault_name(name)?;

        // Skip the expensive KDF when there is nothing to open.
        let location = ctx.container_path(name);
        if !ctx.vault_exists(name) {
            return Err(VaultError::NotFound(format!("vault '{name}'")));
        }

        let master_key = derive_master_key(password, ctx.kdf_params())?;
        let state = container::load(ctx.storage(), &location, &master_key)?;

        if state.name != name {
            warn!(
                vault = %name,
                recorded = %state.name,
                "container name does not match its file name"
            );
        }

        info!(vault = %name, files = state.catalog.len(), "opened vault");
        Ok(Self {
            ctx: ctx.clone(),
            name: name.to_string(),
            root: state.root,
            catalog: state.catalog,
            master_key,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute directory holding this vault's blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn container_path(&self) -> PathBuf {
        self.ctx.container_path(&self.name)
    }

    pub fn contains_file(&self, filename: &str) -> bool {
        self.catalog.contains_key(filename)
    }

    pub fn file_count(&self) -> usize {
        self.catalog.len()
    }

    /// Every stored file, sorted by filename.
    pub fn files(&self) -> Vec<FileEntry> {
        self.catalog
            .iter()
            .map(|(filename, record)| FileEntry {
                filename: filename.clone(),
                id: record.id.clone(),
                size: record.size,
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // File operations
    // ------------------------------------------------------------------

    /// Store `file` under its filename, replacing any earlier file of
    /// the same name.
    ///
    /// A replaced file's blob is left on disk, unreferenced.  If the
    /// blob is written but the catalog cannot be saved, the new blob is
    /// orphaned the same way and the in-memory catalog is rolled back.
    pub fn add_file(&mut self, file: &VaultFile) -> Result<()> {
        file.save(&self.ctx, &self.root)?;

        let previous = self
            .catalog
            .insert(file.filename().to_string(), file.record().clone());

        if let Err(e) = self.save() {
            match previous {
                Some(record) => {
                    self.catalog.insert(file.filename().to_string(), record);
                }
                None => {
                    self.catalog.remove(file.filename());
                }
            }
            warn!(
                vault = %self.name,
                file = %file.filename(),
                id = %file.record().id,
                "catalog save failed; blob left orphaned"
            );
            return Err(e);
        }

        if let Some(old) = previous {
            debug!(file = %file.filename(), orphaned = %old.id, "replaced file");
        }
        info!(vault = %self.name, file = %file.filename(), size = file.size(), "added file");
        Ok(())
    }

    /// Look up `filename` in the catalog.
    pub fn get_file(&self, filename: &str) -> Result<VaultFile> {
        self.catalog
            .get(filename)
            .map(|record| VaultFile::from_record(filename, record.clone()))
            .ok_or_else(|| self.missing_file(filename))
    }

    /// Decrypt a stored file's contents.
    pub fn read_file(&self, file: &VaultFile) -> Result<Zeroizing<Vec<u8>>> {
        file.read(&self.ctx, &self.root)
    }

    /// Decrypt a stored file into a new file at `output`.
    pub fn extract_file(&self, file: &VaultFile, output: &Path) -> Result<()> {
        file.open_into(&self.ctx, &self.root, output)
    }

    /// Remove one file: its blob and its catalog entry.
    ///
    /// A blob that is already gone is logged and otherwise ignored, so a
    /// dangling entry can still be cleaned up.
    pub fn remove_file(&mut self, filename: &str) -> Result<()> {
        let file = self.get_file(filename)?;

        match file.delete_file(&self.ctx, &self.root) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(vault = %self.name, file = %filename, "blob already missing");
            }
            Err(e) => return Err(e),
        }

        self.catalog.remove(filename);
        self.save()?;

        info!(vault = %self.name, file = %filename, "removed file");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the whole catalog to the container.
    pub fn save(&self) -> Result<()> {
        let state = ContainerState {
            name: self.name.clone(),
            root: self.root.clone(),
            catalog: self.catalog.clone(),
        };
        container::persist(
            self.ctx.storage(),
            &self.container_path(),
            &self.master_key,
            &state,
        )
    }

    /// Destroy the vault: every blob, then the container.
    ///
    /// Blob removal is best-effort; anything that could not be removed
    /// is listed in the report.  The container is removed regardless.
    pub fn delete(mut self) -> Result<DeleteReport> {
        let mut report = DeleteReport::default();
        let catalog = std::mem::take(&mut self.catalog);

        for (filename, record) in catalog {
            let file = VaultFile::from_record(filename, record);
            match file.delete_file(&self.ctx, &self.root) {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    warn!(
                        vault = %self.name,
                        file = %file.filename(),
                        error = %e,
                        "could not remove blob"
                    );
                    report.failures.push(BlobFailure {
                        filename: file.filename().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let location = self.container_path();
        match self.ctx.storage().remove(&location) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(vault = %self.name, "container already missing");
            }
            Err(e) => return Err(e),
        }

        info!(
            vault = %self.name,
            removed = report.removed,
            failed = report.failures.len(),
            "deleted vault"
        );
        Ok(report)
    }

    fn missing_file(&self, filename: &str) -> VaultError {
        VaultError::NotFound(format!("file '{filename}' in vault '{}'", self.name))
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("files", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

/// Reject names that would be unsafe or surprising as file names.
pub fn validate_vault_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(VaultError::InvalidValue("vault name is empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(VaultError::InvalidValue(format!(
            "vault name is longer than {MAX_NAME_LEN} characters"
        )));
    }
    if name.starts_with('.') {
        return Err(VaultError::InvalidValue(format!(
            "vault name '{name}' must not start with '.'"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(VaultError::InvalidValue(format!(
            "vault name '{name}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Make `root` absolute and resolve `.` and `..` without touching disk.
fn normalize_root(root: &Path) -> Result<PathBuf> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    Ok(normalize_lexically(&absolute))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;
    use crate::storage::{MemoryStorage, Storage};
    use crate::vault::blob;
    use std::sync::Arc;

    const PASSWORD: &[u8] = b"S3cr3t!";

    fn setup() -> (Arc<MemoryStorage>, VaultContext) {
        let storage = Arc::new(MemoryStorage::new());
        storage.create_dir_all(Path::new("/home/me")).unwrap();
        let ctx = VaultContext::new("/cfg")
            .with_storage(storage.clone())
            .with_kdf_params(KdfParams::with_iterations(10_000));
        (storage, ctx)
    }

    fn source(storage: &MemoryStorage, name: &str, content: &[u8]) -> PathBuf {
        let path = Path::new("/home/me").join(name);
        storage.write(&path, content).unwrap();
        path
    }

    #[test]
    fn new_creates_root_and_container() {
        let (storage, ctx) = setup();
        let vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();

        assert!(storage.is_dir(Path::new("/data/docs")));
        assert!(storage.is_file(Path::new("/cfg/docs.vault")));
        assert_eq!(vault.file_count(), 0);
    }

    #[test]
    fn new_rejects_file_root() {
        let (storage, ctx) = setup();
        let path = source(&storage, "plain", b"x");
        assert!(matches!(
            Vault::new(&ctx, "docs", &path, PASSWORD),
            Err(VaultError::InvalidValue(_))
        ));
        assert!(!ctx.vault_exists("docs"));
    }

    #[test]
    fn rejected_password_or_kdf_leaves_no_root_behind() {
        let (storage, ctx) = setup();
        assert!(matches!(
            Vault::new(&ctx, "docs", Path::new("/data/docs"), b""),
            Err(VaultError::InvalidValue(_))
        ));
        assert!(!storage.exists(Path::new("/data/docs")));

        let weak = ctx.clone().with_kdf_params(KdfParams::with_iterations(1));
        assert!(matches!(
            Vault::new(&weak, "docs", Path::new("/data/docs"), PASSWORD),
            Err(VaultError::KeyDerivation(_))
        ));
        assert!(!storage.exists(Path::new("/data")));
        assert!(!ctx.vault_exists("docs"));
    }

    #[test]
    fn open_missing_vault_is_not_found() {
        let (_storage, ctx) = setup();
        assert!(Vault::open(&ctx, "nope", PASSWORD)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn docs_scenario() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();
        let path = source(&storage, "a.txt", b"xyz");
        vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).unwrap();
        drop(vault);

        let vault = Vault::open(&ctx, "docs", PASSWORD).unwrap();
        let file = vault.get_file("a.txt").unwrap();
        assert_eq!(file.size(), 3);
        assert_eq!(vault.read_file(&file).unwrap().as_slice(), b"xyz");
        assert!(vault.get_file("missing.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn overwrite_orphans_old_blob() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();

        let path = source(&storage, "a.txt", b"first");
        vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).unwrap();
        let path = source(&storage, "a.txt", b"second");
        vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).unwrap();

        assert_eq!(vault.file_count(), 1);
        let file = vault.get_file("a.txt").unwrap();
        assert_eq!(vault.read_file(&file).unwrap().as_slice(), b"second");
        assert_eq!(storage.count_files_in(Path::new("/data/docs")), 2);
    }

    #[test]
    fn failed_catalog_save_rolls_back_and_orphans_blob() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();
        let path = source(&storage, "a.txt", b"xyz");

        storage.deny_writes_under("/cfg");
        assert!(vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).is_err());

        assert!(!vault.contains_file("a.txt"));
        assert_eq!(storage.count_files_in(Path::new("/data/docs")), 1);
    }

    #[test]
    fn remove_file_tolerates_missing_blob() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();
        let path = source(&storage, "a.txt", b"xyz");
        let file = VaultFile::new(&ctx, &path).unwrap();
        vault.add_file(&file).unwrap();

        storage
            .remove(&blob::blob_path(vault.root(), file.record()))
            .unwrap();
        vault.remove_file("a.txt").unwrap();

        let reopened = Vault::open(&ctx, "docs", PASSWORD).unwrap();
        assert_eq!(reopened.file_count(), 0);
        assert!(!reopened.contains_file("a.txt"));
    }

    #[test]
    fn delete_reports_missing_blobs_and_removes_the_rest() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();
        for (name, body) in [("a.txt", b"aaa"), ("b.txt", b"bbb"), ("c.txt", b"ccc")] {
            let path = source(&storage, name, body);
            vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).unwrap();
        }
        let b = vault.get_file("b.txt").unwrap();
        storage
            .remove(&blob::blob_path(vault.root(), b.record()))
            .unwrap();

        let report = vault.delete().unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "b.txt");
        assert_eq!(storage.count_files_in(Path::new("/data/docs")), 0);
        assert!(!ctx.vault_exists("docs"));
    }

    #[test]
    fn files_lists_catalog_in_order() {
        let (storage, ctx) = setup();
        let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), PASSWORD).unwrap();
        for name in ["z.txt", "a.txt"] {
            let path = source(&storage, name, b"1234");
            vault.add_file(&VaultFile::new(&ctx, &path).unwrap()).unwrap();
        }

        let names: Vec<_> = vault.files().into_iter().map(|e| e.filename).collect();
        assert_eq!(names, vec!["a.txt", "z.txt"]);
        assert!(vault.files().iter().all(|e| e.size == 4));
    }

    #[test]
    fn vault_name_rules() {
        for ok in ["docs", "my-vault_2", "v1.0", "A"] {
            assert!(validate_vault_name(ok).is_ok(), "{ok}");
        }
        let long = "x".repeat(MAX_NAME_LEN + 1);
        for bad in ["", ".hidden", "a/b", "a b", "..", "ümlaut", long.as_str()] {
            assert!(
                matches!(validate_vault_name(bad), Err(VaultError::InvalidValue(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn lexical_normalization() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let root = normalize_root(Path::new("some/./dir/..")).unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("some"));
    }
}
