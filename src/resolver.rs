//! Environment to inventory resolution.
//!
//! Which inventory file to use depends on the environment (`live`, `staging`,
//! ...). The mapping is configured as one string, normally taken from the
//! `SCITSI_INVENTORIES` environment variable:
//!
//! - `/etc/ansible/hosts`: one inventory for every environment
//! - `live=/srv/live/hosts.yml,staging=/srv/staging/hosts.ini`: one per environment
//!
//! The mapping is parsed once into [`InventorySources`] and handed to
//! [`InventoryResolver::new`].

use crate::error::{Result, ScitsiError};
use crate::inventory::Inventory;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configured inventory locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySources {
    /// One inventory shared by all environments.
    Single(PathBuf),
    /// One inventory per environment name.
    Keyed(HashMap<String, PathBuf>),
}

impl InventorySources {
    /// Parse a mapping string.
    ///
    /// Returns `None` for an empty value. A value without `=` is a single
    /// path; otherwise it is a comma-separated list of `environment=path`
    /// pairs, and pairs without both sides are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use scitsifreine::resolver::InventorySources;
    /// use std::path::Path;
    ///
    /// let sources = InventorySources::parse("live=/a,prod=/b").unwrap();
    /// assert_eq!(sources.lookup("live"), Some(Path::new("/a")));
    /// assert_eq!(sources.lookup("dev"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if !value.contains('=') {
            return Some(InventorySources::Single(PathBuf::from(value)));
        }

        let mut map = HashMap::new();
        for pair in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((env, path)) if !env.trim().is_empty() && !path.trim().is_empty() => {
                    map.insert(env.trim().to_string(), PathBuf::from(path.trim()));
                }
                _ => warn!(pair, "skipping malformed inventory mapping entry"),
            }
        }
        Some(InventorySources::Keyed(map))
    }

    /// Build a keyed mapping from `environment -> path` entries.
    pub fn from_map(map: HashMap<String, PathBuf>) -> Option<Self> {
        if map.is_empty() {
            None
        } else {
            Some(InventorySources::Keyed(map))
        }
    }

    /// The inventory path for `environment`.
    pub fn lookup(&self, environment: &str) -> Option<&Path> {
        match self {
            InventorySources::Single(path) => Some(path.as_path()),
            InventorySources::Keyed(map) => map.get(environment).map(PathBuf::as_path),
        }
    }

    /// Configured entries as `(environment, path)`, sorted; `*` for a single path.
    pub fn entries(&self) -> Vec<(String, PathBuf)> {
        let mut entries: Vec<(String, PathBuf)> = match self {
            InventorySources::Single(path) => vec![("*".to_string(), path.clone())],
            InventorySources::Keyed(map) => {
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
        };
        entries.sort();
        entries
    }
}

/// Resolves `(environment, group)` pairs to host lists.
#[derive(Debug, Clone)]
pub struct InventoryResolver {
    sources: Option<InventorySources>,
}

impl InventoryResolver {
    pub fn new(sources: Option<InventorySources>) -> Self {
        Self { sources }
    }

    /// The inventory file configured for `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`ScitsiError::NoInventorySource`] if nothing is configured
    /// or the environment has no entry.
    pub fn source_for(&self, environment: &str) -> Result<PathBuf> {
        self.sources
            .as_ref()
            .and_then(|s| s.lookup(environment))
            .map(Path::to_path_buf)
            .ok_or_else(|| ScitsiError::NoInventorySource(environment.to_string()))
    }

    /// Load the inventory for `environment`.
    pub fn load(&self, environment: &str) -> Result<Inventory> {
        let path = self.source_for(environment)?;
        debug!(environment, path = %path.display(), "resolved inventory source");
        Inventory::from_path(&path)
    }

    /// Hosts of `group` in the inventory for `environment`.
    ///
    /// `Ok(None)` means the inventory exists but has no such group.
    pub fn resolve_hosts(&self, environment: &str, group: &str) -> Result<Option<Vec<String>>> {
        let inventory = self.load(environment)?;
        let hosts = inventory.get_hosts(group);
        if hosts.is_none() {
            debug!(environment, group, "group not found in inventory");
        }
        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unkeyed_path_serves_every_environment() {
        let sources = InventorySources::parse("/etc/ansible/hosts").unwrap();
        for env in ["live", "prod", "", "anything"] {
            assert_eq!(sources.lookup(env), Some(Path::new("/etc/ansible/hosts")));
        }
    }

    #[test]
    fn test_keyed_mapping() {
        let sources = InventorySources::parse("live=/a,prod=/b").unwrap();
        assert_eq!(sources.lookup("live"), Some(Path::new("/a")));
        assert_eq!(sources.lookup("prod"), Some(Path::new("/b")));
        assert_eq!(sources.lookup("staging"), None);
    }

    #[test]
    fn test_whitespace_and_malformed_pairs() {
        let sources = InventorySources::parse(" live = /a , broken, =/c, prod=/b ,").unwrap();
        assert_eq!(
            sources.entries(),
            vec![
                ("live".to_string(), PathBuf::from("/a")),
                ("prod".to_string(), PathBuf::from("/b")),
            ]
        );
    }

    #[test]
    fn test_empty_mapping_is_absent() {
        assert_eq!(InventorySources::parse(""), None);
        assert_eq!(InventorySources::parse("   "), None);
        assert_eq!(InventorySources::from_map(HashMap::new()), None);
    }

    #[test]
    fn test_missing_source_errors() {
        let resolver = InventoryResolver::new(None);
        assert!(matches!(
            resolver.source_for("live"),
            Err(ScitsiError::NoInventorySource(env)) if env == "live"
        ));

        let resolver = InventoryResolver::new(InventorySources::parse("live=/a"));
        assert!(matches!(
            resolver.resolve_hosts("prod", "web"),
            Err(ScitsiError::NoInventorySource(_))
        ));
    }

    #[test]
    fn test_resolve_hosts_per_environment() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("live.ini");
        let staging = dir.path().join("staging.yml");
        std::fs::write(&live, "[web]\nweb1.live\nweb2.live\n").unwrap();
        std::fs::write(
            &staging,
            "web:\n  hosts:\n    web1.staging:\n    web2.staging:\n",
        )
        .unwrap();

        let mapping = format!("live={},staging={}", live.display(), staging.display());
        let resolver = InventoryResolver::new(InventorySources::parse(&mapping));

        assert_eq!(
            resolver.resolve_hosts("live", "web").unwrap(),
            Some(vec!["web1.live".to_string(), "web2.live".to_string()])
        );
        assert_eq!(
            resolver.resolve_hosts("staging", "web").unwrap(),
            Some(vec!["web1.staging".to_string(), "web2.staging".to_string()])
        );
        assert_eq!(resolver.resolve_hosts("live", "db").unwrap(), None);
    }
}
