//! `filevault file info` — show a stored file's name and size.

use crate::cli::output;
use crate::cli::{AppContext, Cli};
use crate::errors::{Result, VaultError};

/// Execute `filevault file info <filename> [--vault V]`.
pub fn execute(cli: &Cli, filename: &str, vault: Option<&str>) -> Result<()> {
    let app = AppContext::load(cli)?;
    let name = app.vault_name(vault)?;
    let vault = app.open_vault(&name)?;

    let entry = vault
        .files()
        .into_iter()
        .find(|e| e.filename == filename)
        .ok_or_else(|| {
            VaultError::NotFound(format!("file '{filename}' in vault '{name}'"))
        })?;

    println!("{}", output::formatter(cli.format).file_info(&name, &entry));
    Ok(())
}
