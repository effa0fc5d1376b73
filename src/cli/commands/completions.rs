//! `filevault completions` — print a shell completion script.
//!
//!   filevault completions zsh > ~/.zfunc/_filevault

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

const BIN_NAME: &str = "filevault";

pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    write_completions(shell, &mut io::stdout());
    Ok(())
}

/// Render the completion script for `shell` covering every subcommand.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
}

/// Shell names are matched case-insensitively; `ps` means PowerShell.
fn parse_shell(name: &str) -> Result<Shell> {
    let shell = match name.to_ascii_lowercase().as_str() {
        "ps" => Shell::PowerShell,
        other => other.parse::<Shell>().map_err(|_| {
            VaultError::CommandFailed(format!(
                "unknown shell '{name}' (supported: bash, zsh, fish, powershell, elvish)"
            ))
        })?,
    };
    Ok(shell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_known_shells_case_insensitively() {
        assert_eq!(parse_shell("zsh").unwrap(), Shell::Zsh);
        assert_eq!(parse_shell("BASH").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("PowerShell").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("ps").unwrap(), Shell::PowerShell);
    }

    #[test]
    fn unknown_shell_fails() {
        assert!(parse_shell("csh").is_err());
        assert!(parse_shell("").is_err());
    }

    #[test]
    fn zsh_script_names_the_command_tree() {
        let out = script(Shell::Zsh);
        assert!(out.contains("#compdef filevault"));
        for sub in ["vault", "file", "tools", "encrypt-file", "--config-dir"] {
            assert!(out.contains(sub), "zsh completions missing {sub}");
        }
    }

    #[test]
    fn bash_script_registers_the_binary() {
        let out = script(Shell::Bash);
        assert!(out.contains("_filevault()"));
        assert!(out.contains("decrypt"));
    }
}
