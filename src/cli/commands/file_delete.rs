//! `filevault file delete` — remove one stored file from a vault.

use crate::cli::output::{self, Outcome};
use crate::cli::{confirm, AppContext, Cli};
use crate::errors::Result;

/// Execute `filevault file delete <filename> [--vault V] [--force]`.
pub fn execute(cli: &Cli, filename: &str, vault: Option<&str>, force: bool) -> Result<()> {
    let app = AppContext::load(cli)?;
    let name = app.vault_name(vault)?;
    let mut vault = app.open_vault(&name)?;

    // Fail on unknown names before asking anything.
    vault.get_file(filename)?;

    if !force && !confirm(&format!("Delete '{filename}' from vault '{name}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.remove_file(filename)?;

    app.audit("file-delete", &name, Some(filename), None);

    println!(
        "{}",
        output::formatter(cli.format).outcome(&Outcome {
            action: "file-delete",
            vault: name.clone(),
            filename: Some(filename.to_string()),
            message: format!("Deleted '{filename}' from vault '{name}'"),
        })
    );
    Ok(())
}
