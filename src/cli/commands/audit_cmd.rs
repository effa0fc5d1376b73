//! `filevault audit` — display the audit log.
//!
//! Usage:
//!   filevault audit               # show last 50 entries
//!   filevault audit --last 20     # show last 20
//!   filevault audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::AuditLog;
use crate::cli::output;
use crate::cli::{AppContext, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let app = AppContext::load(cli)?;

    let audit = AuditLog::open(&app.config_root)
        .ok_or_else(|| VaultError::Audit("failed to open audit database".into()))?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = audit.query(last, since_dt)?;
    println!("{}", output::formatter(cli.format).audit_entries(&entries));

    Ok(())
}

/// Turn "7d", "24h" or "30m" into the point in time that long ago.
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        VaultError::CommandFailed(format!(
            "invalid duration '{input}' (use a format like 7d, 24h, or 30m)"
        ))
    };

    let (split, _) = input.char_indices().last().ok_or_else(invalid)?;
    let (num_str, unit) = input.split_at(split);
    let num: i64 = num_str.parse().map_err(|_| invalid())?;
    if num < 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "d" => chrono::Duration::days(num),
        "h" => chrono::Duration::hours(num),
        "m" => chrono::Duration::minutes(num),
        _ => return Err(invalid()),
    };

    Ok(Utc::now() - duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_days() {
        let dt = parse_duration("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_duration_hours() {
        let dt = parse_duration("24h").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_hours() - 24).abs() <= 1);
    }

    #[test]
    fn parse_duration_minutes() {
        let dt = parse_duration(" 30m ").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_duration_invalid() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("7x").is_err());
        assert!(parse_duration("d").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("-3d").is_err());
        assert!(parse_duration("7\u{e9}").is_err());
    }

    #[test]
    fn since_filter_keeps_recent_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let audit = AuditLog::open(dir.path()).unwrap();

        audit.log("file-add", "docs", Some("a.txt"), None);

        let since = parse_duration("1h").unwrap();
        assert_eq!(audit.query(10, Some(since)).unwrap().len(), 1);
    }
}
