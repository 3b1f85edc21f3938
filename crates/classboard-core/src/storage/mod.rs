mod config;

pub use config::{Config, NotificationsConfig, PresenceConfig, ResolverConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/classboard[-dev]/` based on CLASSBOARD_ENV.
///
/// Set CLASSBOARD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CLASSBOARD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("classboard-dev")
    } else {
        base_dir.join("classboard")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
