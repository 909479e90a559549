//! Ansible TOML inventories.
//!
//! ```toml
//! [web.hosts]
//! "web1.example.com" = {}
//!
//! [prod]
//! children = ["web"]
//! vars = { env = "prod" }
//! ```

use super::pattern::expand_hosts;
use super::{GroupMap, InventoryParser, add_child, add_hosts};
use crate::error::{Result, ScitsiError};
use toml::{Table, Value};
use tracing::warn;

/// Parser for TOML inventories.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlParser;

impl InventoryParser for TomlParser {
    fn parse(&self, source: &str) -> Result<GroupMap> {
        let document: Table =
            toml::from_str(source).map_err(|e| ScitsiError::inventory(e.to_string()))?;

        let mut groups = GroupMap::new();
        for (name, body) in &document {
            let body = body.as_table().ok_or_else(|| {
                ScitsiError::inventory(format!("group '{}' must be a table", name))
            })?;
            groups.entry(name.clone()).or_default();

            for (key, value) in body {
                match (key.as_str(), value) {
                    ("hosts", Value::Table(hosts)) => {
                        for host in hosts.keys() {
                            add_hosts(&mut groups, name, expand_hosts(host)?);
                        }
                    }
                    ("children", Value::Array(children)) => {
                        for child in children {
                            let child = child.as_str().ok_or_else(|| {
                                ScitsiError::inventory(format!(
                                    "children of group '{}' must be strings",
                                    name
                                ))
                            })?;
                            add_child(&mut groups, name, child);
                        }
                    }
                    ("hosts", _) | ("children", _) => {
                        return Err(ScitsiError::inventory(format!(
                            "'{}' of group '{}' has the wrong type",
                            key, name
                        )));
                    }
                    ("vars", _) => {}
                    _ => warn!(group = %name, key = %key, "ignoring unknown inventory key"),
                }
            }
        }
        Ok(groups)
    }
}
