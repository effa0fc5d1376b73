//! `filevault vault info` — show a vault's root and stored files.

use crate::cli::output;
use crate::cli::{AppContext, Cli};
use crate::errors::Result;

/// Execute `filevault vault info <name>`.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let app = AppContext::load(cli)?;
    let vault = app.open_vault(name)?;

    println!(
        "{}",
        output::formatter(cli.format).vault_info(vault.name(), vault.root(), &vault.files())
    );
    Ok(())
}
