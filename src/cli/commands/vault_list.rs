//! `filevault vault list` — list vault names.  No password needed.

use crate::cli::output;
use crate::cli::{AppContext, Cli};
use crate::errors::Result;

/// Execute `filevault vault list`.
pub fn execute(cli: &Cli) -> Result<()> {
    let app = AppContext::load(cli)?;
    let names = app.vaults.list_vaults()?;

    println!("{}", output::formatter(cli.format).vault_list(&names));
    Ok(())
}
