//! `filevault file decrypt` — write a stored file's plaintext to disk.

use std::path::Path;

use crate::cli::output::{self, Outcome};
use crate::cli::{AppContext, Cli};
use crate::errors::{Result, VaultError};

/// Execute `filevault file decrypt <filename> <output> [--vault V]`.
pub fn execute(cli: &Cli, filename: &str, out: &Path, vault: Option<&str>) -> Result<()> {
    let app = AppContext::load(cli)?;
    let name = app.vault_name(vault)?;

    if out.exists() {
        return Err(VaultError::InvalidValue(format!(
            "output {} already exists",
            out.display()
        )));
    }

    let vault = app.open_vault(&name)?;
    let file = vault.get_file(filename)?;
    vault.extract_file(&file, out)?;

    app.audit("file-get", &name, Some(filename), None);

    println!(
        "{}",
        output::formatter(cli.format).outcome(&Outcome {
            action: "file-get",
            vault: name.clone(),
            filename: Some(filename.to_string()),
            message: format!("Decrypted '{filename}' to {}", out.display()),
        })
    );
    Ok(())
}
