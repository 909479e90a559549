//! Config file discovery and loading.
//!
//! The config file search order is:
//!
//! 1. `$XDG_CONFIG_HOME/scitsifreine/config.toml`
//! 2. `~/.config/scitsifreine/config.toml`
//! 3. Platform default (e.g., `~/Library/Application Support` on macOS)
//!
//! The inventory mapping comes from the [`INVENTORY_ENV_VAR`] environment
//! variable, falling back to the config file's `[inventories]` table.

use crate::config::Config;
use crate::error::{Result, ScitsiError};
use crate::resolver::InventorySources;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the environment -> inventory mapping.
pub const INVENTORY_ENV_VAR: &str = "SCITSI_INVENTORIES";

const APP_DIR: &str = "scitsifreine";
const CONFIG_FILE: &str = "config.toml";

/// Determine the config file path.
///
/// Returns the first existing candidate. If none exists, returns
/// `~/.config/scitsifreine/config.toml` as the default location.
///
/// # Errors
///
/// Returns [`ScitsiError::NoConfigDir`] if no config directory can be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        candidates.push(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join(APP_DIR).join(CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(APP_DIR).join(CONFIG_FILE));
    }

    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_DIR).join(CONFIG_FILE))
        .ok_or(ScitsiError::NoConfigDir)
}

/// Load and parse a config file from the given path.
///
/// # Errors
///
/// - [`ScitsiError::ConfigNotFound`] if the file doesn't exist
/// - [`ScitsiError::IoError`] if reading fails
/// - [`ScitsiError::ConfigParse`] if TOML parsing fails
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(ScitsiError::ConfigNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let config = Config::from_str(&contents)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Load config from an explicit path, or from the default path if it exists.
///
/// A missing default config is not an error; defaults are used instead.
pub fn load(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        return Ok((load_config(path)?, Some(path.to_path_buf())));
    }

    let path = default_config_path()?;
    if path.exists() {
        Ok((load_config(&path)?, Some(path)))
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok((Config::default(), None))
    }
}

/// Read [`INVENTORY_ENV_VAR`] once and combine it with the config.
pub fn inventory_sources(config: &Config) -> Option<InventorySources> {
    let value = std::env::var(INVENTORY_ENV_VAR).ok();
    select_inventory_sources(value.as_deref(), config)
}

/// The environment variable wins when set and non-empty.
pub fn select_inventory_sources(env_value: Option<&str>, config: &Config) -> Option<InventorySources> {
    env_value
        .and_then(InventorySources::parse)
        .or_else(|| config.inventory_sources())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_live() -> Config {
        Config::from_str("[inventories]\nlive = \"/from/config\"\n").unwrap()
    }

    #[test]
    fn test_env_value_overrides_config() {
        let sources = select_inventory_sources(Some("live=/from/env"), &config_with_live()).unwrap();
        assert_eq!(sources.lookup("live"), Some(Path::new("/from/env")));
    }

    #[test]
    fn test_empty_env_value_falls_back_to_config() {
        for value in [None, Some(""), Some("  ")] {
            let sources = select_inventory_sources(value, &config_with_live()).unwrap();
            assert_eq!(sources.lookup("live"), Some(Path::new("/from/config")));
        }
    }

    #[test]
    fn test_nothing_configured() {
        assert_eq!(select_inventory_sources(None, &Config::default()), None);
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nclose_on_exit = true\n").unwrap();

        let (config, used) = load(Some(&path)).unwrap();
        assert!(config.defaults.close_on_exit);
        assert_eq!(used, Some(path));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            load_config(&path),
            Err(ScitsiError::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults\n").unwrap();
        assert!(matches!(load_config(&path), Err(ScitsiError::ConfigParse(_))));
    }
}
