//! Two-pass parser for the hosts configuration.
//!
//! Pass one walks the lines, builds every base group with its devices and port
//! ranges, and records the body of each `[name:children]` section untouched.
//! Pass two resolves those bodies against the groups built by pass one, so a
//! children group may reference groups declared further down the file.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::fabric::{Guid, PortRange};
use crate::hosts::{ConfigError, Group, GroupKind, HostsConfig};
use crate::warn;

const CHILDREN_SUFFIX: &str = ":children";

enum Header<'a> {
    Base {
        name: &'a str,
        port_range: Option<PortRange>,
    },
    Children {
        name: &'a str,
    },
}

enum Section<'a> {
    None,
    Base {
        name: &'a str,
        port_range: Option<PortRange>,
    },
    Children {
        name: &'a str,
    },
}

pub(super) fn parse(text: &str) -> Result<HostsConfig, ConfigError> {
    let mut groups: IndexMap<String, Group> = IndexMap::new();
    let mut device_ranges: HashMap<Guid, PortRange> = HashMap::new();
    let mut children: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut section = Section::None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = parse_header(line, line_no) {
            section = open_section(header, &mut groups, &mut children);
            continue;
        }

        match section {
            Section::Base { name, port_range } => {
                if !is_device_line(line) {
                    warn!("Line {line_no}: '{line}' is not a device GUID, ignoring");
                    continue;
                }
                let guid: Guid = match line.parse() {
                    Ok(guid) => guid,
                    Err(e) => {
                        warn!("Line {line_no}: {e}, ignoring");
                        continue;
                    }
                };
                if let Some(range) = port_range {
                    record_device_range(&mut device_ranges, &guid, range, name);
                }
                if let Some(group) = groups.get_mut(name) {
                    group.devices.push(guid);
                }
            }
            Section::Children { name } => {
                if is_device_line(line) {
                    warn!("Line {line_no}: '{name}{CHILDREN_SUFFIX}' lists groups, not devices; ignoring '{line}'");
                    continue;
                }
                if let Some(refs) = children.get_mut(name) {
                    refs.push(line.to_string());
                }
            }
            Section::None => {
                warn!("Line {line_no}: '{line}' appears before any group header, ignoring");
            }
        }
    }

    resolve_children(&mut groups, &children)?;

    Ok(HostsConfig {
        groups,
        device_ranges,
    })
}

fn is_device_line(line: &str) -> bool {
    line.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("0x"))
}

/// Parses `[name]`, `[name:children]`, `[name:A-B]` and `[name:N]`.
///
/// A port spec that does not parse leaves the group unrestricted.
fn parse_header(line: &str, line_no: usize) -> Option<Header<'_>> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?.trim();

    if let Some(name) = inner.strip_suffix(CHILDREN_SUFFIX) {
        return Some(Header::Children { name: name.trim() });
    }

    let Some((name, spec)) = inner.split_once(':') else {
        return Some(Header::Base {
            name: inner,
            port_range: None,
        });
    };

    let port_range = match spec.parse::<PortRange>() {
        Ok(range) => Some(range),
        Err(e) => {
            warn!("Line {line_no}: invalid port range '{spec}' ({e}), all ports will be used");
            None
        }
    };

    Some(Header::Base {
        name: name.trim(),
        port_range,
    })
}

fn open_section<'a>(
    header: Header<'a>,
    groups: &mut IndexMap<String, Group>,
    children: &mut IndexMap<String, Vec<String>>,
) -> Section<'a> {
    match header {
        Header::Base { name, .. } | Header::Children { name } if name.is_empty() => {
            warn!("Group header without a name, ignoring its body");
            Section::None
        }
        Header::Base { name, port_range } => {
            let group = groups
                .entry(name.to_string())
                .or_insert_with(|| Group::new(name, GroupKind::Base));
            if port_range.is_some() {
                group.port_range = port_range;
            }
            Section::Base { name, port_range }
        }
        Header::Children { name } => {
            let group = groups
                .entry(name.to_string())
                .or_insert_with(|| Group::new(name, GroupKind::Children));
            group.kind = GroupKind::Children;
            children.entry(name.to_string()).or_default();
            Section::Children { name }
        }
    }
}

/// Overrides are keyed by device only: the last header that lists a device wins.
fn record_device_range(
    device_ranges: &mut HashMap<Guid, PortRange>,
    guid: &Guid,
    range: PortRange,
    group: &str,
) {
    if let Some(previous) = device_ranges.insert(guid.clone(), range) {
        if previous != range {
            warn!("{guid} already had port range {previous}, group '{group}' replaces it with {range}");
        }
    }
}

fn resolve_children(
    groups: &mut IndexMap<String, Group>,
    children: &IndexMap<String, Vec<String>>,
) -> Result<(), ConfigError> {
    let mut resolver = Resolver {
        groups: &*groups,
        children,
        resolved: HashMap::new(),
        visiting: Vec::new(),
    };

    for name in children.keys() {
        resolver.resolve(name)?;
    }

    let resolved = resolver.resolved;
    for (name, devices) in resolved {
        if let Some(group) = groups.get_mut(&name) {
            group.devices = devices;
        }
    }
    Ok(())
}

struct Resolver<'a> {
    groups: &'a IndexMap<String, Group>,
    children: &'a IndexMap<String, Vec<String>>,
    resolved: HashMap<String, Vec<Guid>>,
    visiting: Vec<String>,
}

impl Resolver<'_> {
    /// Final device list of `name`: its own devices followed by those of every
    /// referenced group, recursively. Duplicates are kept.
    fn resolve(&mut self, name: &str) -> Result<Vec<Guid>, ConfigError> {
        if let Some(devices) = self.resolved.get(name) {
            return Ok(devices.clone());
        }

        if self.visiting.iter().any(|visiting| visiting == name) {
            let mut chain = self.visiting.clone();
            chain.push(name.to_string());
            return Err(ConfigError::Cycle {
                chain: chain.join(" -> "),
            });
        }

        let mut devices: Vec<Guid> = self
            .groups
            .get(name)
            .map(|group| group.devices.clone())
            .unwrap_or_default();

        let Some(refs) = self.children.get(name) else {
            return Ok(devices);
        };

        self.visiting.push(name.to_string());
        for child in refs {
            if !self.groups.contains_key(child) {
                warn!("Group '{name}{CHILDREN_SUFFIX}' references unknown group '{child}', ignoring");
                continue;
            }
            let child_devices = self.resolve(child)?;
            debug!(
                "Adding group '{child}' to parent group '{name}' ({} devices)",
                child_devices.len()
            );
            devices.extend(child_devices);
        }
        self.visiting.pop();

        self.resolved.insert(name.to_string(), devices.clone());
        Ok(devices)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
