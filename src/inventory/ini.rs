//! Ansible INI inventories.

use super::pattern::expand_hosts;
use super::{GroupMap, InventoryParser, add_child, add_hosts};
use crate::error::{Result, ScitsiError};

/// Group that collects hosts listed before the first section.
const UNGROUPED: &str = "ungrouped";

/// Parser for `[group]` / `[group:children]` / `[group:vars]` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct IniParser;

enum Section {
    Hosts(String),
    Children(String),
    Vars,
}

impl InventoryParser for IniParser {
    fn parse(&self, source: &str) -> Result<GroupMap> {
        let mut groups = GroupMap::new();
        let mut section = Section::Hosts(UNGROUPED.to_string());

        for (lineno, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = strip_comment(line)
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
            {
                section = parse_header(header.trim())
                    .ok_or_else(|| ScitsiError::inventory(format!("line {}: invalid section [{}]", lineno + 1, header)))?;
                if let Section::Hosts(name) | Section::Children(name) = &section {
                    groups.entry(name.clone()).or_default();
                }
                continue;
            }

            match &section {
                Section::Hosts(group) => {
                    let Some(token) = line.split_whitespace().next() else {
                        continue;
                    };
                    let hosts = expand_hosts(strip_port(token))?;
                    add_hosts(&mut groups, group, hosts);
                }
                Section::Children(parent) => {
                    let child = line.split_whitespace().next().unwrap_or(line);
                    add_child(&mut groups, parent, child);
                }
                Section::Vars => {}
            }
        }

        Ok(groups)
    }
}

fn parse_header(header: &str) -> Option<Section> {
    let section = match header.rsplit_once(':') {
        Some((name, "children")) => Section::Children(name.to_string()),
        Some((_, "vars")) => Section::Vars,
        Some((name, "hosts")) => Section::Hosts(name.to_string()),
        Some(_) => return None,
        None => Section::Hosts(header.to_string()),
    };
    match &section {
        Section::Hosts(name) | Section::Children(name) if name.is_empty() => None,
        _ => Some(section),
    }
}

/// Drops a trailing `#` or `;` comment from a section header line.
fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

/// `host:2222` names the host `host`; other colons (IPv6) are kept.
fn strip_port(token: &str) -> &str {
    match token.split_once(':') {
        Some((host, port))
            if !host.is_empty() && !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) =>
        {
            host
        }
        _ => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_vars_and_comments() {
        let source = "\
# leading comment
loose.example.com

[web]
web1.example.com ansible_host=10.0.0.1
web2.example.com:2222
; another comment

[web:vars]
http_port=80

[all:children]
web
";
        let groups = IniParser.parse(source).unwrap();
        assert_eq!(groups["ungrouped"].hosts, ["loose.example.com"]);
        assert_eq!(groups["web"].hosts, ["web1.example.com", "web2.example.com"]);
        assert_eq!(groups["all"].children, ["web"]);
        assert!(!groups.contains_key("http_port=80"));
    }

    #[test]
    fn test_empty_section_declares_group() {
        let groups = IniParser.parse("[empty]\n").unwrap();
        assert_eq!(groups["empty"].hosts.len(), 0);
    }

    #[test]
    fn test_ranges_expand() {
        let groups = IniParser.parse("[db]\ndb[1:3]\n").unwrap();
        assert_eq!(groups["db"].hosts, ["db1", "db2", "db3"]);
    }

    #[test]
    fn test_invalid_header() {
        assert!(IniParser.parse("[:children]\nweb\n").is_err());
    }

    #[test]
    fn test_unknown_header_suffix_is_rejected() {
        let err = IniParser.parse("[web:foo]\nweb1\n").unwrap_err();
        assert!(err.to_string().contains("[web:foo]"), "{}", err);
    }

    #[test]
    fn test_header_with_trailing_comment() {
        let groups = IniParser.parse("[web] # frontends\nweb1\nweb2\n\n[db:children] ; nested\nweb\n").unwrap();
        assert_eq!(groups["web"].hosts, ["web1", "web2"]);
        assert_eq!(groups["db"].children, ["web"]);
        assert!(!groups.contains_key("ungrouped"));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("host:22"), "host");
        assert_eq!(strip_port("fe80::1"), "fe80::1");
        assert_eq!(strip_port("plain"), "plain");
    }
}
