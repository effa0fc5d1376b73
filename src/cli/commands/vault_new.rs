//! `filevault vault new` — create a vault.
//!
//! Usage:
//!   filevault vault new docs              # blobs go in the current directory
//!   filevault vault new docs ~/encrypted  # blobs go in ~/encrypted

use std::path::Path;

use crate::cli::output::{self, Outcome};
use crate::cli::{prompt_new_password, AppContext, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{validate_vault_name, Vault};

/// Execute `filevault vault new <name> [root]`.
pub fn execute(cli: &Cli, name: &str, root: Option<&Path>) -> Result<()> {
    validate_vault_name(name)?;

    let app = AppContext::load(cli)?;
    if app.vaults.vault_exists(name) {
        return Err(VaultError::CommandFailed(format!(
            "vault '{name}' already exists; delete it first or pick another name"
        )));
    }

    let root = match root {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let password = prompt_new_password()?;
    let vault = Vault::new(&app.vaults, name, &root, password.as_bytes())?;

    app.audit(
        "vault-new",
        name,
        None,
        Some(&format!("root {}", vault.root().display())),
    );

    let fmt = output::formatter(cli.format);
    println!(
        "{}",
        fmt.outcome(&Outcome {
            action: "vault-new",
            vault: name.to_string(),
            filename: None,
            message: format!(
                "Created vault '{name}' (files stored in {})",
                vault.root().display()
            ),
        })
    );
    if cli.format == output::OutputFormat::Text {
        output::tip(&format!("Run `filevault file add <PATH> --vault {name}` to add a file."));
    }

    Ok(())
}
