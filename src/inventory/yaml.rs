//! Ansible YAML inventories.
//!
//! Each top-level key is a group. A group body may contain `hosts` (a mapping
//! of host name to host vars), `children` (a mapping of child group name to
//! its own body) and `vars`. Nested children are groups in their own right.

use super::pattern::expand_hosts;
use super::{GroupMap, InventoryParser, add_child, add_hosts};
use crate::error::{Result, ScitsiError};
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// Parser for YAML (and JSON) inventories.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

impl InventoryParser for YamlParser {
    fn parse(&self, source: &str) -> Result<GroupMap> {
        let document: Value =
            serde_yaml::from_str(source).map_err(|e| ScitsiError::inventory(e.to_string()))?;

        let mut groups = GroupMap::new();
        match document {
            Value::Null => {}
            Value::Mapping(top) => {
                for (name, body) in &top {
                    let name = key_str(name, "group name")?;
                    register_group(&mut groups, &name, body)?;
                }
            }
            _ => return Err(ScitsiError::inventory("top level must be a mapping of groups")),
        }
        Ok(groups)
    }
}

fn register_group(groups: &mut GroupMap, name: &str, body: &Value) -> Result<()> {
    groups.entry(name.to_string()).or_default();

    let body = match body {
        Value::Null => return Ok(()),
        Value::Mapping(body) => body,
        _ => {
            return Err(ScitsiError::inventory(format!(
                "group '{}' must be a mapping",
                name
            )));
        }
    };

    for (key, value) in body {
        match key.as_str() {
            Some("hosts") => {
                for host in mapping_or_empty(value, name, "hosts")?.keys() {
                    let host = key_str(host, "host name")?;
                    add_hosts(groups, name, expand_hosts(&host)?);
                }
            }
            Some("children") => {
                for (child, child_body) in mapping_or_empty(value, name, "children")? {
                    let child = key_str(child, "group name")?;
                    add_child(groups, name, &child);
                    register_group(groups, &child, child_body)?;
                }
            }
            Some("vars") => {}
            _ => warn!(group = name, key = ?key, "ignoring unknown inventory key"),
        }
    }
    Ok(())
}

fn mapping_or_empty<'a>(value: &'a Value, group: &str, field: &str) -> Result<&'a Mapping> {
    static EMPTY: std::sync::OnceLock<Mapping> = std::sync::OnceLock::new();
    match value {
        Value::Null => Ok(EMPTY.get_or_init(Mapping::new)),
        Value::Mapping(m) => Ok(m),
        _ => Err(ScitsiError::inventory(format!(
            "'{}' of group '{}' must be a mapping",
            field, group
        ))),
    }
}

/// Keys may be written as numbers or booleans in YAML; accept them as text.
fn key_str(key: &Value, what: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ScitsiError::inventory(format!("invalid {}: {:?}", what, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_children_become_groups() {
        let source = "\
all:
  hosts:
    jump.example.com:
  children:
    web:
      hosts:
        web1.example.com:
          ansible_port: 2222
        web2.example.com:
      vars:
        http_port: 80
    prod:
      children:
        web:
";
        let groups = YamlParser.parse(source).unwrap();
        assert_eq!(groups["all"].hosts, ["jump.example.com"]);
        assert_eq!(groups["all"].children, ["web", "prod"]);
        assert_eq!(groups["web"].hosts, ["web1.example.com", "web2.example.com"]);
        assert_eq!(groups["prod"].children, ["web"]);
    }

    #[test]
    fn test_json_inventory() {
        let source = r#"{"db": {"hosts": {"db1": null, "db2": {}}}}"#;
        let groups = YamlParser.parse(source).unwrap();
        assert_eq!(groups["db"].hosts, ["db1", "db2"]);
    }

    #[test]
    fn test_empty_document_and_null_group() {
        assert!(YamlParser.parse("").unwrap().is_empty());
        let groups = YamlParser.parse("lonely:\n").unwrap();
        assert!(groups["lonely"].hosts.is_empty());
    }

    #[test]
    fn test_rejects_non_mapping_shapes() {
        assert!(YamlParser.parse("- a\n- b\n").is_err());
        assert!(YamlParser.parse("web:\n  hosts:\n    - web1\n").is_err());
    }
}
