//! User configuration: the config root and `config.toml`.

pub mod settings;

pub use settings::{resolve_config_root, Settings, CONFIG_DIR_NAME};
