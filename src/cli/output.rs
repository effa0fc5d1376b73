//! Terminal output: styled status lines and the result formatters.
//!
//! Status lines (errors, warnings, hints) go straight to the terminal.
//! Command results are rendered by a `Formatter`, either as tables for
//! people or as JSON for scripts.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use console::style;
use serde::Serialize;
use serde_json::json;

#[cfg(feature = "audit-log")]
use crate::audit::AuditEntry;
use crate::vault::{DeleteReport, FileEntry};

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn success_line(msg: &str) -> String {
    format!("{} {}", style("\u{2713}").green().bold(), msg)
}

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Result of a command that changes something.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub action: &'static str,
    pub vault: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub message: String,
}

/// Renders command results.  Implementations return the whole output
/// so commands decide where it goes.
pub trait Formatter {
    fn outcome(&self, outcome: &Outcome) -> String;
    fn vault_list(&self, names: &[String]) -> String;
    fn vault_info(&self, name: &str, root: &Path, files: &[FileEntry]) -> String;
    fn file_info(&self, vault: &str, entry: &FileEntry) -> String;
    fn delete_report(&self, vault: &str, report: &DeleteReport) -> String;
    #[cfg(feature = "audit-log")]
    fn audit_entries(&self, entries: &[AuditEntry]) -> String;
}

/// Pick the formatter for `format`.
pub fn formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Human-readable output: styled lines and `comfy-table` tables.
pub struct TextFormatter;

impl TextFormatter {
    fn table(header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(header);
        table
    }
}

impl Formatter for TextFormatter {
    fn outcome(&self, outcome: &Outcome) -> String {
        success_line(&outcome.message)
    }

    fn vault_list(&self, names: &[String]) -> String {
        if names.is_empty() {
            return format!(
                "No vaults yet.\n{}",
                style("Run `filevault vault new <NAME>` to create one.").dim()
            );
        }

        let mut table = Self::table(vec!["Vault"]);
        for name in names {
            table.add_row(vec![name.clone()]);
        }
        format!("{}\n{table}", style(format!("{} vaults:", names.len())).bold())
    }

    fn vault_info(&self, name: &str, root: &Path, files: &[FileEntry]) -> String {
        let heading = format!(
            "{} {}\n{} {}",
            style("Vault:").bold(),
            name,
            style("Root:").bold(),
            root.display()
        );
        if files.is_empty() {
            return format!("{heading}\nNo files in this vault yet.");
        }

        let mut table = Self::table(vec!["File", "Size"]);
        for entry in files {
            table.add_row(vec![entry.filename.clone(), human_size(entry.size)]);
        }
        format!("{heading}\n{table}")
    }

    fn file_info(&self, vault: &str, entry: &FileEntry) -> String {
        let mut table = Self::table(vec!["Field", "Value"]);
        table.add_row(vec!["Vault".to_string(), vault.to_string()]);
        table.add_row(vec!["File".to_string(), entry.filename.clone()]);
        table.add_row(vec!["Size".to_string(), human_size(entry.size)]);
        table.add_row(vec!["Id".to_string(), entry.id.clone()]);
        table.to_string()
    }

    fn delete_report(&self, vault: &str, report: &DeleteReport) -> String {
        let mut out = success_line(&format!(
            "Deleted vault '{vault}' ({} files removed)",
            report.removed
        ));
        for failure in &report.failures {
            out.push_str(&format!(
                "\n{} could not remove {}: {}",
                style("\u{26a0}").yellow().bold(),
                failure.filename,
                failure.error
            ));
        }
        out
    }

    #[cfg(feature = "audit-log")]
    fn audit_entries(&self, entries: &[AuditEntry]) -> String {
        if entries.is_empty() {
            return "No audit entries found.".to_string();
        }

        let mut table = Self::table(vec!["Time", "Operation", "Vault", "File", "Details"]);
        for entry in entries {
            table.add_row(vec![
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                colorize_operation(&entry.operation),
                entry.vault.clone(),
                entry.filename.as_deref().unwrap_or("-").to_string(),
                entry.details.as_deref().unwrap_or("-").to_string(),
            ]);
        }
        format!(
            "{}\n{table}",
            style(format!("{} audit entries:", entries.len())).bold()
        )
    }
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    match op {
        "vault-new" => style(op).green().to_string(),
        "file-add" => style(op).blue().to_string(),
        "file-get" => style(op).cyan().to_string(),
        "file-delete" | "vault-delete" => style(op).red().to_string(),
        _ => op.to_string(),
    }
}

/// `1536` -> `1.5 KiB`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Machine-readable output: one JSON document per command.
pub struct JsonFormatter;

impl JsonFormatter {
    fn render(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl Formatter for JsonFormatter {
    fn outcome(&self, outcome: &Outcome) -> String {
        Self::render(&json!(outcome))
    }

    fn vault_list(&self, names: &[String]) -> String {
        Self::render(&json!({ "vaults": names }))
    }

    fn vault_info(&self, name: &str, root: &Path, files: &[FileEntry]) -> String {
        Self::render(&json!({
            "name": name,
            "root": root,
            "files": files,
        }))
    }

    fn file_info(&self, vault: &str, entry: &FileEntry) -> String {
        Self::render(&json!({
            "vault": vault,
            "filename": entry.filename,
            "id": entry.id,
            "size": entry.size,
        }))
    }

    fn delete_report(&self, vault: &str, report: &DeleteReport) -> String {
        Self::render(&json!({
            "vault": vault,
            "removed": report.removed,
            "failures": report.failures,
        }))
    }

    #[cfg(feature = "audit-log")]
    fn audit_entries(&self, entries: &[AuditEntry]) -> String {
        Self::render(&json!({ "entries": entries }))
    }
}
