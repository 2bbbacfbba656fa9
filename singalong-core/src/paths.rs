//! Path constants for configuration and bundled assets.

use std::path::PathBuf;

/// The name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "singalong";

/// The name of the main configuration file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The name of the bundled assets directory
pub const ASSETS_DIR_NAME: &str = "assets";

/// Get the configuration directory path (~/.config/singalong/)
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_DIR_NAME)
}

/// Get the config file path (~/.config/singalong/config.toml)
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Get the default assets directory (~/.config/singalong/assets/)
#[must_use]
pub fn default_assets_dir() -> PathBuf {
    config_dir().join(ASSETS_DIR_NAME)
}
