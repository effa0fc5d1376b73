//! `filevault file add` — encrypt a file into a vault.
//!
//! The stored name is the file's base name; adding another file with
//! the same name replaces the earlier one.

use std::path::Path;

use crate::cli::output::{self, Outcome};
use crate::cli::{AppContext, Cli};
use crate::errors::Result;
use crate::vault::VaultFile;

/// Execute `filevault file add <path> [--vault V]`.
pub fn execute(cli: &Cli, path: &Path, vault: Option<&str>) -> Result<()> {
    let app = AppContext::load(cli)?;
    let name = app.vault_name(vault)?;

    // Check the source before asking for a password.
    let file = VaultFile::new(&app.vaults, path)?;

    let mut vault = app.open_vault(&name)?;
    let replaced = vault.contains_file(file.filename());
    vault.add_file(&file)?;

    app.audit(
        "file-add",
        &name,
        Some(file.filename()),
        Some(&format!("{} bytes", file.size())),
    );

    let verb = if replaced { "Replaced" } else { "Added" };
    println!(
        "{}",
        output::formatter(cli.format).outcome(&Outcome {
            action: "file-add",
            vault: name.clone(),
            filename: Some(file.filename().to_string()),
            message: format!(
                "{verb} '{}' in vault '{name}' ({})",
                file.filename(),
                output::human_size(file.size())
            ),
        })
    );
    Ok(())
}
