use clap::Parser;
use tracing_subscriber::EnvFilter;

use filevault::cli::commands;
use filevault::cli::{Cli, Commands, FileAction, VaultAction};

/// Log to stderr.  `RUST_LOG` wins; otherwise `--verbose` means debug.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(format!("filevault={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Vault { ref action } => match action {
            VaultAction::New { name, root } => {
                commands::vault_new::execute(&cli, name, root.as_deref())
            }
            VaultAction::List => commands::vault_list::execute(&cli),
            VaultAction::Info { name } => commands::vault_info::execute(&cli, name),
            VaultAction::Delete { name, force } => {
                commands::vault_delete::execute(&cli, name, *force)
            }
        },
        Commands::File { ref action } => match action {
            FileAction::Add { path, vault } => {
                commands::file_add::execute(&cli, path, vault.as_deref())
            }
            FileAction::Decrypt {
                filename,
                output,
                vault,
            } => commands::file_decrypt::execute(&cli, filename, output, vault.as_deref()),
            FileAction::Info { filename, vault } => {
                commands::file_info::execute(&cli, filename, vault.as_deref())
            }
            FileAction::Delete {
                filename,
                vault,
                force,
            } => commands::file_delete::execute(&cli, filename, vault.as_deref(), *force),
        },
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Tools { ref action } => commands::tools::execute(action),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(),
    };

    if let Err(e) = result {
        filevault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
