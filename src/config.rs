//! Configuration file types.
//!
//! The config file is optional. It supplies defaults for CLI flags and a
//! fallback inventory mapping used when `SCITSI_INVENTORIES` is not set.
//!
//! # Config Format
//!
//! ```toml
//! [defaults]
//! close_on_exit = true
//! prefix = "multissh"
//!
//! [inventories]
//! live = "/srv/ansible/live/hosts.yml"
//! staging = "/srv/ansible/staging/hosts.ini"
//! ```

use crate::naming::DEFAULT_PREFIX;
use crate::resolver::InventorySources;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Settings applied when not overridden on the command line.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
    /// Kill the tmux session once the user detaches.
    pub close_on_exit: bool,
    /// Session name prefix.
    pub prefix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            close_on_exit: false,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: Defaults,
    /// Environment name -> inventory path.
    pub inventories: HashMap<String, PathBuf>,
}

impl Config {
    /// Parse config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `toml::de::Error` if the TOML is malformed or has unknown
    /// top-level keys.
    pub fn from_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Inventory mapping from the `[inventories]` table, if any.
    pub fn inventory_sources(&self) -> Option<InventorySources> {
        InventorySources::from_map(self.inventories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.prefix, "multissh");
        assert!(!config.defaults.close_on_exit);
        assert_eq!(config.inventory_sources(), None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_str(
            r#"
[defaults]
close_on_exit = true
prefix = "ops"

[inventories]
live = "/srv/live.yml"
"#,
        )
        .unwrap();
        assert!(config.defaults.close_on_exit);
        assert_eq!(config.defaults.prefix, "ops");
        let sources = config.inventory_sources().unwrap();
        assert_eq!(sources.lookup("live"), Some(Path::new("/srv/live.yml")));
        assert_eq!(sources.lookup("prod"), None);
    }

    #[test]
    fn test_unknown_sections_are_rejected() {
        assert!(Config::from_str("[servers.x]\nhost = \"a\"\n").is_err());
    }
}
