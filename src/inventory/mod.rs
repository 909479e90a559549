//! Ansible inventory loading and group resolution.
//!
//! An inventory is parsed into a [`GroupMap`]: every group with its own hosts
//! and the names of its child groups. Each supported file format is an
//! [`InventoryParser`]; [`InventoryFormat`] picks one by file extension or by
//! sniffing the content.
//!
//! # Formats
//!
//! ```ini
//! [web]
//! web1.example.com
//! web2.example.com ansible_port=2222
//!
//! [prod:children]
//! web
//! ```
//!
//! ```yaml
//! all:
//!   children:
//!     web:
//!       hosts:
//!         web1.example.com:
//!         web2.example.com:
//! ```
//!
//! ```toml
//! [web.hosts]
//! "web1.example.com" = {}
//! "web2.example.com" = {}
//!
//! [prod]
//! children = ["web"]
//! ```

mod ini;
pub mod pattern;
mod toml_file;
mod yaml;

pub use ini::IniParser;
pub use toml_file::TomlParser;
pub use yaml::YamlParser;

use crate::error::{Result, ScitsiError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Members of one inventory group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    /// Hosts listed directly in this group, first-seen order, no repeats.
    pub hosts: Vec<String>,
    /// Names of child groups, first-seen order, no repeats.
    pub children: Vec<String>,
}

/// All groups of an inventory, keyed by group name.
pub type GroupMap = HashMap<String, Group>;

/// Adds `hosts` to `group`, creating the group if needed.
///
/// A group's own membership is a set: hosts already present are skipped.
pub(crate) fn add_hosts(groups: &mut GroupMap, group: &str, hosts: Vec<String>) {
    let members = &mut groups.entry(group.to_string()).or_default().hosts;
    for host in hosts {
        if !members.contains(&host) {
            members.push(host);
        }
    }
}

/// Declares `child` as a child of `parent`; both groups become known.
pub(crate) fn add_child(groups: &mut GroupMap, parent: &str, child: &str) {
    groups.entry(child.to_string()).or_default();
    let children = &mut groups.entry(parent.to_string()).or_default().children;
    if !children.iter().any(|c| c == child) {
        children.push(child.to_string());
    }
}

/// Turns inventory source text into groups.
pub trait InventoryParser {
    /// Parse `source` into a group map.
    ///
    /// # Errors
    ///
    /// Returns [`ScitsiError::InventoryParse`] if the text is malformed.
    fn parse(&self, source: &str) -> Result<GroupMap>;
}

/// Supported inventory file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    /// Ansible INI style: `[group]`, `[group:children]`.
    Ini,
    /// Ansible YAML style (JSON inventories parse as YAML too).
    Yaml,
    /// Ansible TOML style.
    Toml,
}

impl InventoryFormat {
    /// Format implied by the file extension, if any.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ini" | "cfg" => Some(InventoryFormat::Ini),
            "yml" | "yaml" | "json" => Some(InventoryFormat::Yaml),
            "toml" => Some(InventoryFormat::Toml),
            _ => None,
        }
    }

    /// Guess the format from the file content.
    ///
    /// Documents made of TOML tables are TOML; otherwise a first significant
    /// line starting with `[` means INI; anything else is YAML.
    pub fn sniff(source: &str) -> Self {
        if let Ok(table) = toml::from_str::<toml::Table>(source) {
            if !table.is_empty() && table.values().all(toml::Value::is_table) {
                return InventoryFormat::Toml;
            }
        }

        let first = source
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with(';'));
        match first {
            Some(line) if line.starts_with('[') => InventoryFormat::Ini,
            _ => InventoryFormat::Yaml,
        }
    }

    /// Extension first, then content sniffing.
    pub fn detect(path: &Path, source: &str) -> Self {
        Self::from_extension(path).unwrap_or_else(|| Self::sniff(source))
    }

    /// The parser implementing this format.
    pub fn parser(self) -> Box<dyn InventoryParser> {
        match self {
            InventoryFormat::Ini => Box::new(IniParser),
            InventoryFormat::Yaml => Box::new(YamlParser),
            InventoryFormat::Toml => Box::new(TomlParser),
        }
    }
}

/// A parsed inventory.
#[derive(Debug, Clone)]
pub struct Inventory {
    path: Option<PathBuf>,
    groups: GroupMap,
}

impl Inventory {
    /// Load an inventory file, detecting its format.
    ///
    /// # Errors
    ///
    /// - [`ScitsiError::IoError`] if the file cannot be read
    /// - [`ScitsiError::InventoryParse`] if parsing or validation fails
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let format = InventoryFormat::detect(path, &source);
        debug!(path = %path.display(), ?format, "loading inventory");

        let mut inventory = Self::from_source(&source, format).map_err(|e| match e {
            ScitsiError::InventoryParse { message, .. } => ScitsiError::InventoryParse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        inventory.path = Some(path.to_path_buf());
        Ok(inventory)
    }

    /// Parse inventory text in the given format.
    pub fn from_source(source: &str, format: InventoryFormat) -> Result<Self> {
        Self::from_parser(source, format.parser().as_ref())
    }

    /// Parse inventory text with any parser.
    pub fn from_parser(source: &str, parser: &dyn InventoryParser) -> Result<Self> {
        let groups = parser.parse(source)?;
        check_cycles(&groups)?;
        Ok(Self { path: None, groups })
    }

    /// The file this inventory was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether `name` is a group of this inventory.
    pub fn is_group_known(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// All hosts of group `name`, including those of its child groups.
    ///
    /// The group's own hosts come first, then each child's hosts in the order
    /// the children were declared. Hosts reachable through several children
    /// appear once per path. Returns `None` if the group does not exist.
    pub fn get_hosts(&self, name: &str) -> Option<Vec<String>> {
        if !self.is_group_known(name) {
            return None;
        }
        let mut hosts = Vec::new();
        let mut stack = HashSet::new();
        self.collect_hosts(name, &mut stack, &mut hosts);
        Some(hosts)
    }

    fn collect_hosts<'a>(&'a self, name: &'a str, stack: &mut HashSet<&'a str>, out: &mut Vec<String>) {
        let Some(group) = self.groups.get(name) else {
            return;
        };
        if !stack.insert(name) {
            return;
        }
        out.extend(group.hosts.iter().cloned());
        for child in &group.children {
            self.collect_hosts(child, stack, out);
        }
        stack.remove(name);
    }

    /// Group names, sorted alphabetically.
    pub fn groups(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Reject group composition cycles such as `a -> b -> a`.
fn check_cycles(groups: &GroupMap) -> Result<()> {
    fn visit<'a>(
        groups: &'a GroupMap,
        name: &'a str,
        path: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = path.iter().position(|n| *n == name) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(name);
            return Err(ScitsiError::inventory(format!(
                "circular group reference: {}",
                cycle.join(" -> ")
            )));
        }
        path.push(name);
        if let Some(group) = groups.get(name) {
            for child in &group.children {
                visit(groups, child, path, done)?;
            }
        }
        path.pop();
        done.insert(name);
        Ok(())
    }

    let mut done = HashSet::new();
    let mut names: Vec<&String> = groups.keys().collect();
    names.sort();
    for name in names {
        visit(groups, name, &mut Vec::new(), &mut done)?;
    }
    Ok(())
}
