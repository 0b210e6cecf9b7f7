//! # Link Statistics
//!
//! Aggregate and per-group counters over the included link records, with the list
//! of down ports per device.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ibpdc_common::fabric::{Guid, LinkRecord, PortRange};
use ibpdc_common::hosts::HostsConfig;

/// Port restriction shown next to a group name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeAnnotation {
    Single(PortRange),
    /// Devices of the group carry different override ranges. Sorted, no duplicates.
    Mixed(Vec<PortRange>),
}

impl fmt::Display for RangeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAnnotation::Single(range) => write!(f, "port range: {range}"),
            RangeAnnotation::Mixed(ranges) => {
                let joined: Vec<String> = ranges.iter().map(PortRange::to_string).collect();
                write!(f, "mixed port ranges: {}", joined.join(", "))
            }
        }
    }
}

/// Down ports of one device, in ascending numeric order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePorts {
    pub guid: Guid,
    pub name: String,
    pub ports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: String,
    pub range: Option<RangeAnnotation>,
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub down_ports: Vec<DevicePorts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStatistics {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    /// Empty when no configuration was used.
    pub groups: Vec<GroupSummary>,
}

impl LinkStatistics {
    /// Summarizes `records`. Groups are listed in `targets` order, or in
    /// declaration order when no targets were requested.
    pub fn compute(records: &[LinkRecord], config: Option<&HostsConfig>, targets: &[String]) -> Self {
        let down = records.iter().filter(|record| record.is_down()).count();
        let mut stats = LinkStatistics {
            total: records.len(),
            up: records.len() - down,
            down,
            groups: Vec::new(),
        };

        let Some(config) = config else {
            return stats;
        };

        let names: Vec<&str> = if targets.is_empty() {
            config.group_names()
        } else {
            let mut names: Vec<&str> = Vec::new();
            for target in targets {
                if !names.contains(&target.as_str()) {
                    names.push(target);
                }
            }
            names
        };

        stats.groups = names
            .into_iter()
            .map(|name| summarize_group(name, records, config))
            .collect();
        stats
    }

    /// Share of down links in percent, `None` when nothing is down.
    pub fn down_percentage(&self) -> Option<f64> {
        if self.down == 0 || self.total == 0 {
            return None;
        }
        Some(self.down as f64 / self.total as f64 * 100.0)
    }
}

fn summarize_group(name: &str, records: &[LinkRecord], config: &HostsConfig) -> GroupSummary {
    let members: Vec<&LinkRecord> = records.iter().filter(|record| record.group == name).collect();
    let down: Vec<&LinkRecord> = members.iter().copied().filter(|record| record.is_down()).collect();

    GroupSummary {
        name: name.to_string(),
        range: range_annotation(&members, config.port_range(name), config),
        total: members.len(),
        up: members.len() - down.len(),
        down: down.len(),
        down_ports: down_ports_by_device(&down),
    }
}

fn range_annotation(
    members: &[&LinkRecord],
    group_range: Option<PortRange>,
    config: &HostsConfig,
) -> Option<RangeAnnotation> {
    let overrides: BTreeSet<PortRange> = members
        .iter()
        .filter_map(|record| config.device_range(record.source_guid.as_str()))
        .collect();

    match overrides.len() {
        0 => group_range.map(RangeAnnotation::Single),
        1 => overrides.into_iter().next().map(RangeAnnotation::Single),
        _ => Some(RangeAnnotation::Mixed(overrides.into_iter().collect())),
    }
}

fn down_ports_by_device(down: &[&LinkRecord]) -> Vec<DevicePorts> {
    let mut by_device: BTreeMap<(Guid, String), Vec<String>> = BTreeMap::new();
    for record in down {
        by_device
            .entry((record.source_guid.clone(), record.source_name.clone()))
            .or_default()
            .push(record.source_port.clone());
    }

    by_device
        .into_iter()
        .map(|((guid, name), mut ports)| {
            ports.sort_by_key(|port| (port.parse::<u32>().unwrap_or(u32::MAX), port.clone()));
            DevicePorts { guid, name, ports }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
