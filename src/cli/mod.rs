//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{resolve_config_root, Settings};
use crate::errors::{Result, VaultError};
use crate::vault::{Vault, VaultContext};

use self::output::OutputFormat;

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_ENV: &str = "VAULT_PASSWORD";

/// FileVault CLI: password-protected encrypted file vaults.
#[derive(Parser)]
#[command(
    name = "filevault",
    about = "Password-protected encrypted file vaults",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base directory for vault containers (default: home directory)
    #[arg(long, env = "VAULT_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create, list, inspect and delete vaults
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Add, decrypt, inspect and delete files in a vault
    File {
        #[command(subcommand)]
        action: FileAction,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Standalone key, text and file encryption helpers
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },

    /// Show version
    Version,
}

/// `vault` subcommands.
#[derive(clap::Subcommand)]
pub enum VaultAction {
    /// Create a new vault
    New {
        /// Vault name
        name: String,
        /// Directory for the encrypted files (default: current directory)
        root: Option<PathBuf>,
    },

    /// List all vaults
    List,

    /// Show the files stored in a vault
    Info {
        /// Vault name
        name: String,
    },

    /// Delete a vault and every file in it
    Delete {
        /// Vault name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// `tools` subcommands.
#[derive(clap::Subcommand)]
pub enum ToolsAction {
    /// Print random UUIDs
    Uuid {
        /// How many to print
        #[arg(short, long, default_value = "1")]
        number: usize,
    },

    /// Print a new random encryption key (hex)
    EncryptionKey,

    /// Encrypt a string, printing a base64 token
    EncryptText {
        /// Text to encrypt
        input: String,
        /// Key from `tools encryption-key`
        #[arg(short, long)]
        encryption_key: String,
    },

    /// Decrypt a token from `encrypt-text`
    DecryptText {
        /// Token to decrypt
        input: String,
        /// Key from `tools encryption-key`
        #[arg(short, long)]
        encryption_key: String,
    },

    /// Encrypt a file (default output: <PATH>.enc)
    EncryptFile {
        /// File to encrypt
        path: PathBuf,
        /// Key from `tools encryption-key`
        #[arg(short, long)]
        encryption_key: String,
        /// Where to write the ciphertext (must not exist)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decrypt a file from `encrypt-file`
    DecryptFile {
        /// File to decrypt
        path: PathBuf,
        /// Key from `tools encryption-key`
        #[arg(short, long)]
        encryption_key: String,
        /// Where to write the plaintext (must not exist)
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// `file` subcommands.
#[derive(clap::Subcommand)]
pub enum FileAction {
    /// Encrypt a file into a vault
    Add {
        /// File to add
        path: PathBuf,
        /// Vault to use (default: `default_vault` from config.toml)
        #[arg(long)]
        vault: Option<String>,
    },

    /// Decrypt a stored file to a new path
    Decrypt {
        /// Name of the stored file
        filename: String,
        /// Where to write the plaintext (must not exist)
        output: PathBuf,
        /// Vault to use (default: `default_vault` from config.toml)
        #[arg(long)]
        vault: Option<String>,
    },

    /// Show a stored file's name and size
    Info {
        /// Name of the stored file
        filename: String,
        /// Vault to use (default: `default_vault` from config.toml)
        #[arg(long)]
        vault: Option<String>,
    },

    /// Remove a stored file from a vault
    Delete {
        /// Name of the stored file
        filename: String,
        /// Vault to use (default: `default_vault` from config.toml)
        #[arg(long)]
        vault: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs: where containers live, the user's
/// settings, and the vault context built from them.
pub struct AppContext {
    pub config_root: PathBuf,
    pub settings: Settings,
    pub vaults: VaultContext,
}

impl AppContext {
    /// Resolve the config root and load `config.toml`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_root = resolve_config_root(cli.config_dir.as_deref())?;
        let settings = Settings::load(&config_root)?;
        let vaults = VaultContext::from_settings(&config_root, &settings);
        debug!(config_root = %config_root.display(), ?settings, "loaded configuration");

        Ok(Self {
            config_root,
            settings,
            vaults,
        })
    }

    /// The vault named on the command line, or the configured default.
    pub fn vault_name(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_owned)
            .or_else(|| self.settings.default_vault.clone())
            .ok_or_else(|| {
                VaultError::Config(
                    "no vault given: pass --vault or set default_vault in config.toml".into(),
                )
            })
    }

    /// Prompt for the password and open vault `name`.
    pub fn open_vault(&self, name: &str) -> Result<Vault> {
        if !self.vaults.vault_exists(name) {
            return Err(VaultError::NotFound(format!("vault '{name}'")));
        }

        let password = prompt_password()?;
        Vault::open(&self.vaults, name, password.as_bytes()).map_err(|e| match e {
            VaultError::Authentication => VaultError::CommandFailed(
                "could not open vault: wrong password or corrupted data".into(),
            ),
            other => other,
        })
    }

    /// Record an operation in the audit log.  Never fails the command.
    pub fn audit(&self, operation: &str, vault: &str, filename: Option<&str>, details: Option<&str>) {
        log_audit(&self.config_root, operation, vault, filename, details);
    }
}

/// Get the vault password, trying in order:
/// 1. `VAULT_PASSWORD` env var (scripts and tests)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `vault new`).
///
/// Also respects `VAULT_PASSWORD` for scripted use.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose vault password")
            .with_confirmation(
                "Confirm vault password",
                "Passwords do not match, try again",
            )
            .allow_empty_password(true)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.is_empty() {
            output::warning("Password cannot be empty. Try again.");
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Ask a yes/no question, defaulting to "no".
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Log an audit event, silently ignoring any failure.
#[cfg(feature = "audit-log")]
pub fn log_audit(
    config_root: &Path,
    operation: &str,
    vault: &str,
    filename: Option<&str>,
    details: Option<&str>,
) {
    if let Some(audit) = crate::audit::AuditLog::open(config_root) {
        audit.log(operation, vault, filename, details);
    }
}

/// Audit logging is compiled out; nothing to record.
#[cfg(not(feature = "audit-log"))]
pub fn log_audit(
    _config_root: &Path,
    _operation: &str,
    _vault: &str,
    _filename: Option<&str>,
    _details: Option<&str>,
) {
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_file_decrypt_with_global_format() {
        let cli = Cli::try_parse_from([
            "filevault", "file", "decrypt", "a.txt", "out.txt", "--vault", "docs", "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::File {
                action:
                    FileAction::Decrypt {
                        filename,
                        output,
                        vault,
                    },
            } => {
                assert_eq!(filename, "a.txt");
                assert_eq!(output, PathBuf::from("out.txt"));
                assert_eq!(vault.as_deref(), Some("docs"));
            }
            _ => panic!("expected file decrypt"),
        }
    }

    #[test]
    fn vault_new_root_is_optional() {
        let cli = Cli::try_parse_from(["filevault", "vault", "new", "docs"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Vault {
                action: VaultAction::New { root: None, .. }
            }
        ));
    }

    #[test]
    fn vault_name_falls_back_to_default() {
        let app = AppContext {
            config_root: PathBuf::from("/cfg"),
            settings: Settings {
                default_vault: Some("docs".into()),
                ..Settings::default()
            },
            vaults: VaultContext::new("/cfg"),
        };
        assert_eq!(app.vault_name(None).unwrap(), "docs");
        assert_eq!(app.vault_name(Some("other")).unwrap(), "other");
    }

    #[test]
    fn vault_name_without_default_is_config_error() {
        let app = AppContext {
            config_root: PathBuf::from("/cfg"),
            settings: Settings::default(),
            vaults: VaultContext::new("/cfg"),
        };
        assert!(matches!(app.vault_name(None), Err(VaultError::Config(_))));
    }
}
