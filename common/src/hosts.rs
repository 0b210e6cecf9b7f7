//! # Hosts Configuration
//!
//! An Ansible-inventory-like description of the fabric:
//!
//! ```text
//! # leaf switches, only the downlinks matter
//! [leaf:1-32]
//! 0xe41d2d0300a1b2c3
//! 0xe41d2d0300a1b2c4
//!
//! [spine]
//! 0xe41d2d0300ffee01
//!
//! [fabric:children]
//! leaf
//! spine
//! ```
//!
//! Groups keep the order in which the file first mentions them; the classifier
//! relies on that order to pick a group for devices listed more than once.

pub mod error;
mod loader;

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::fabric::{Guid, PortRange};

pub use error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Lists devices directly.
    Base,
    /// Lists other groups; its devices are theirs.
    Children,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub kind: GroupKind,
    pub devices: Vec<Guid>,
    pub port_range: Option<PortRange>,
}

impl Group {
    pub fn new(name: &str, kind: GroupKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            devices: Vec::new(),
            port_range: None,
        }
    }

    pub fn contains(&self, guid: &Guid) -> bool {
        self.devices.iter().any(|device| device == guid)
    }
}

/// The parsed configuration. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostsConfig {
    groups: IndexMap<String, Group>,
    device_ranges: HashMap<Guid, PortRange>,
}

impl HostsConfig {
    /// Reads and parses the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        loader::parse(text)
    }

    /// Group names in declaration order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Devices of `name`, empty for unknown groups.
    pub fn devices(&self, name: &str) -> &[Guid] {
        self.groups
            .get(name)
            .map(|group| group.devices.as_slice())
            .unwrap_or_default()
    }

    pub fn port_range(&self, name: &str) -> Option<PortRange> {
        self.groups.get(name).and_then(|group| group.port_range)
    }

    /// Override range of a device, looked up case-insensitively.
    pub fn device_range(&self, guid: &str) -> Option<PortRange> {
        let guid: Guid = guid.parse().ok()?;
        self.device_ranges.get(&guid).copied()
    }

    /// Every configured device, de-duplicated and sorted.
    pub fn all_devices(&self) -> BTreeSet<&Guid> {
        self.groups
            .values()
            .flat_map(|group| group.devices.iter())
            .collect()
    }

    /// The subset of `names` that are not configured, in input order.
    pub fn unknown_groups<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.contains_group(name))
            .collect()
    }
}
