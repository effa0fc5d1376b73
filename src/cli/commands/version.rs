//! `filevault version` — display version and build details.

use console::style;

use crate::crypto::kdf::DEFAULT_ITERATIONS;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("filevault {}", env!("CARGO_PKG_VERSION"));
    println!(
        "{}",
        style(format!(
            "AES-256-GCM envelopes, PBKDF2-HMAC-SHA256 keys ({DEFAULT_ITERATIONS} iterations by default)"
        ))
        .dim()
    );
    if cfg!(feature = "audit-log") {
        println!("{}", style("audit log: enabled").dim());
    }
    Ok(())
}
