//! One module per subcommand.

#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod completions;
pub mod file_add;
pub mod file_decrypt;
pub mod file_delete;
pub mod file_info;
pub mod vault_delete;
pub mod vault_info;
pub mod vault_list;
pub mod vault_new;
pub mod tools;
pub mod version;
