//! `filevault vault delete` — destroy a vault and all its blobs.

use crate::cli::output;
use crate::cli::{confirm, AppContext, Cli};
use crate::errors::Result;

/// Execute `filevault vault delete <name> [--force]`.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let app = AppContext::load(cli)?;
    let vault = app.open_vault(name)?;

    if !force {
        let prompt = format!(
            "Delete vault '{name}' and its {} files? This cannot be undone",
            vault.file_count()
        );
        if !confirm(&prompt)? {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let report = vault.delete()?;

    app.audit(
        "vault-delete",
        name,
        None,
        Some(&format!(
            "{} removed, {} failed",
            report.removed,
            report.failures.len()
        )),
    );

    println!("{}", output::formatter(cli.format).delete_report(name, &report));
    Ok(())
}
