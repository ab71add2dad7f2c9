//! Configuration directory resolution

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Name of the configuration directory under the user's home.
pub const CONFIG_DIR_NAME: &str = ".codestash";

/// Subdirectory of the config dir holding one JSON file per profile.
pub const PROFILES_DIR_NAME: &str = "profiles";

/// Get the user's home directory.
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// container setups which override HOME resolve the same directory the
/// user's shell does.
pub fn home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("could not determine home directory"))
}

/// The fixed configuration directory (`~/.codestash`).
pub fn config_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_DIR_NAME))
}

/// The profile directory (`~/.codestash/profiles`).
pub fn profiles_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join(PROFILES_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_under_home() {
        if std::env::var("HOME").is_ok() {
            let dir = config_dir().unwrap();
            assert!(dir.ends_with(CONFIG_DIR_NAME));
            let profiles = profiles_dir().unwrap();
            assert!(profiles.starts_with(&dir));
        }
    }
}
