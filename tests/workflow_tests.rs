//! Multi-step workflows across several vaults, run on `MemoryStorage`.

use std::path::Path;
use std::sync::Arc;

use filevault::crypto::KdfParams;
use filevault::errors::VaultError;
use filevault::storage::{MemoryStorage, Storage};
use filevault::vault::{Vault, VaultContext, VaultFile};

fn context() -> (Arc<MemoryStorage>, VaultContext) {
    let storage = Arc::new(MemoryStorage::new());
    storage.create_dir_all(Path::new("/home/me")).unwrap();
    let ctx = VaultContext::new("/home/me/.vault")
        .with_storage(storage.clone())
        .with_kdf_params(KdfParams::with_iterations(10_000));
    (storage, ctx)
}

fn add(storage: &MemoryStorage, ctx: &VaultContext, vault: &mut Vault, name: &str, body: &[u8]) {
    let path = Path::new("/home/me").join(name);
    storage.write(&path, body).unwrap();
    vault.add_file(&VaultFile::new(ctx, &path).unwrap()).unwrap();
}

#[test]
fn vaults_are_isolated_from_each_other() {
    let (storage, ctx) = context();
    let mut work = Vault::new(&ctx, "work", Path::new("/data/work"), b"pw-work").unwrap();
    let mut home = Vault::new(&ctx, "home", Path::new("/data/home"), b"pw-home").unwrap();

    add(&storage, &ctx, &mut work, "report.pdf", b"quarterly");
    add(&storage, &ctx, &mut home, "taxes.csv", b"2025");

    assert_eq!(ctx.list_vaults().unwrap(), vec!["home", "work"]);

    let work = Vault::open(&ctx, "work", b"pw-work").unwrap();
    assert!(work.contains_file("report.pdf"));
    assert!(!work.contains_file("taxes.csv"));

    assert!(matches!(
        Vault::open(&ctx, "home", b"pw-work"),
        Err(VaultError::Authentication)
    ));
}

#[test]
fn same_password_different_vaults_still_open_independently() {
    let (storage, ctx) = context();
    let mut a = Vault::new(&ctx, "a", Path::new("/data/a"), b"shared").unwrap();
    let b = Vault::new(&ctx, "b", Path::new("/data/b"), b"shared").unwrap();
    add(&storage, &ctx, &mut a, "x.txt", b"x");
    drop(b);

    let b = Vault::open(&ctx, "b", b"shared").unwrap();
    assert_eq!(b.file_count(), 0);
    assert_eq!(Vault::open(&ctx, "a", b"shared").unwrap().file_count(), 1);
}

#[test]
fn remove_file_then_reopen() {
    let (storage, ctx) = context();
    let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), b"pw").unwrap();
    add(&storage, &ctx, &mut vault, "a.txt", b"aaa");
    add(&storage, &ctx, &mut vault, "b.txt", b"bbb");

    vault.remove_file("a.txt").unwrap();
    assert!(vault.remove_file("a.txt").unwrap_err().is_not_found());

    let vault = Vault::open(&ctx, "docs", b"pw").unwrap();
    let names: Vec<_> = vault.files().into_iter().map(|e| e.filename).collect();
    assert_eq!(names, vec!["b.txt"]);
    assert_eq!(storage.count_files_in(Path::new("/data/docs")), 1);
}

#[test]
fn extract_everything_after_reopen() {
    let (storage, ctx) = context();
    let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), b"pw").unwrap();
    let files: [(&str, &[u8]); 3] = [
        ("empty.bin", b""),
        ("small.txt", b"hello"),
        ("large.bin", &[0x5Au8; 64 * 1024]),
    ];
    for (name, body) in files {
        add(&storage, &ctx, &mut vault, name, body);
    }

    let vault = Vault::open(&ctx, "docs", b"pw").unwrap();
    storage.create_dir_all(Path::new("/restore")).unwrap();
    for (name, body) in files {
        let file = vault.get_file(name).unwrap();
        assert_eq!(file.size(), body.len() as u64);

        let out = Path::new("/restore").join(name);
        vault.extract_file(&file, &out).unwrap();
        assert_eq!(storage.read(&out).unwrap(), body);
    }
}

#[test]
fn relative_segments_in_root_are_normalized() {
    let (_storage, ctx) = context();
    let vault = Vault::new(&ctx, "docs", Path::new("/data/./x/../docs"), b"pw").unwrap();
    assert_eq!(vault.root(), Path::new("/data/docs"));

    let vault = Vault::open(&ctx, "docs", b"pw").unwrap();
    assert_eq!(vault.root(), Path::new("/data/docs"));
}

#[test]
fn delete_then_recreate_same_name() {
    let (storage, ctx) = context();
    let mut vault = Vault::new(&ctx, "docs", Path::new("/data/docs"), b"old").unwrap();
    add(&storage, &ctx, &mut vault, "a.txt", b"a");
    vault.delete().unwrap();
    assert!(!ctx.vault_exists("docs"));

    Vault::new(&ctx, "docs", Path::new("/data/docs"), b"new").unwrap();
    assert!(matches!(
        Vault::open(&ctx, "docs", b"old"),
        Err(VaultError::Authentication)
    ));
    assert_eq!(Vault::open(&ctx, "docs", b"new").unwrap().file_count(), 0);
}
