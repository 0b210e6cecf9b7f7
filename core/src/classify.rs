//! # Link Classification
//!
//! Assigns every link record to at most one configured group and splits the records
//! into the ones that fall inside their group's port range and the ones that do not.
//!
//! Candidate groups are checked in a fixed order and the first group listing the
//! source device wins, even if a later group would have accepted the port:
//!
//! * with target groups, the order in which they were requested;
//! * without, the order in which the configuration file declares them.
//!
//! The effective port range of a match is the device override if there is one,
//! otherwise the group range, otherwise every port is accepted.

use ibpdc_common::fabric::{LinkRecord, PortRange, UNKNOWN_GROUP};
use ibpdc_common::hosts::{Group, HostsConfig};
use ibpdc_common::warn;

/// Result of [`classify`]. Every input record ends up in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub included: Vec<LinkRecord>,
    pub excluded: Vec<LinkRecord>,
}

pub fn classify(
    records: Vec<LinkRecord>,
    config: Option<&HostsConfig>,
    targets: &[String],
) -> Classification {
    let Some(config) = config else {
        return Classification {
            included: records,
            excluded: Vec::new(),
        };
    };

    let Some(candidates) = candidate_groups(config, targets) else {
        warn!(
            "None of the requested groups ({}) exist in the configuration, no filtering applied",
            targets.join(", ")
        );
        return Classification {
            included: records,
            excluded: Vec::new(),
        };
    };

    let mut result = Classification::default();
    for mut record in records {
        if classify_record(&mut record, config, &candidates) {
            result.included.push(record);
        } else {
            result.excluded.push(record);
        }
    }
    result
}

/// Groups to check, in match order. `None` when a non-empty target list names
/// no known group.
pub fn candidate_groups<'a>(config: &'a HostsConfig, targets: &[String]) -> Option<Vec<&'a Group>> {
    if targets.is_empty() {
        return Some(config.groups().collect());
    }

    let mut groups: Vec<&Group> = Vec::new();
    for name in targets {
        if let Some(group) = config.group(name) {
            if !groups.iter().any(|seen| seen.name == group.name) {
                groups.push(group);
            }
        }
    }

    if groups.is_empty() { None } else { Some(groups) }
}

/// Labels `record` and returns whether it is included.
fn classify_record(record: &mut LinkRecord, config: &HostsConfig, candidates: &[&Group]) -> bool {
    record.group = UNKNOWN_GROUP.to_string();

    let Some(port) = record.port_number() else {
        return false;
    };

    let Some(group) = candidates
        .iter()
        .find(|group| group.contains(&record.source_guid))
    else {
        return false;
    };

    record.group = group.name.clone();

    match effective_range(config, record, group) {
        Some(range) => range.contains(port),
        None => true,
    }
}

fn effective_range(config: &HostsConfig, record: &LinkRecord, group: &Group) -> Option<PortRange> {
    config
        .device_range(record.source_guid.as_str())
        .or(group.port_range)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use ibpdc_common::fabric::Guid;

    fn record(guid: &str, port: &str) -> LinkRecord {
        let guid: Guid = guid.parse().unwrap();
        LinkRecord::up(guid, "switch", "1", port)
    }

    fn config(text: &str) -> HostsConfig {
        HostsConfig::parse(text).unwrap()
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_without_config_everything_is_included() {
        let records = vec![record("0xaaaa", "1"), record("0xbbbb", "x")];
        let result = classify(records.clone(), None, &[]);
        assert_eq!(result.included, records);
        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_leaf_range_scenario() {
        let config = config("[leaf:33-64]\n0xaaaa\n");
        let result = classify(vec![record("0xaaaa", "40"), record("0xaaaa", "10")], Some(&config), &[]);

        assert_eq!(result.included.len(), 1);
        assert_eq!(result.included[0].source_port, "40");
        assert_eq!(result.included[0].group, "leaf");

        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].source_port, "10");
        assert_eq!(result.excluded[0].group, "leaf");
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let config = config("[leaf:33-64]\n0xaaaa\n");
        let records = vec![record("0xaaaa", "33"), record("0xaaaa", "64"), record("0xaaaa", "65")];
        let result = classify(records, Some(&config), &[]);
        assert_eq!(result.included.len(), 2);
        assert_eq!(result.excluded.len(), 1);
    }

    #[test]
    fn test_unrestricted_group_includes_all_ports() {
        let config = config("[spine]\n0xcccc\n");
        let result = classify(vec![record("0xcccc", "1"), record("0xcccc", "128")], Some(&config), &[]);
        assert_eq!(result.included.len(), 2);
        assert!(result.included.iter().all(|r| r.group == "spine"));
    }

    #[test]
    fn test_unmatched_device_is_unknown() {
        let config = config("[spine]\n0xcccc\n");
        let result = classify(vec![record("0xdddd", "1")], Some(&config), &[]);
        assert!(result.included.is_empty());
        assert_eq!(result.excluded[0].group, UNKNOWN_GROUP);
    }

    #[test]
    fn test_non_numeric_port_is_unknown() {
        let config = config("[spine]\n0xcccc\n");
        let result = classify(vec![record("0xcccc", "9999999999999")], Some(&config), &[]);
        assert_eq!(result.excluded.len(), 1);
        assert_eq!(result.excluded[0].group, UNKNOWN_GROUP);
    }

    #[test]
    fn test_device_override_beats_group_range() {
        // 0xaaaa inherits 1-32 from leaf; inside `all` (33-64) the override still applies.
        let config = config("[leaf:1-32]\n0xaaaa\n[all:33-64]\n0xbbbb\n[all:children]\nleaf\n");
        let result = classify(
            vec![record("0xaaaa", "10"), record("0xaaaa", "40")],
            Some(&config),
            &targets(&["all"]),
        );
        assert_eq!(result.included.len(), 1);
        assert_eq!(result.included[0].source_port, "10");
        assert_eq!(result.included[0].group, "all");
        assert_eq!(result.excluded[0].source_port, "40");
    }

    #[test]
    fn test_first_match_wins_in_declaration_order() {
        let config = config("[narrow:1-8]\n0xaaaa\n[wide]\n0xaaaa\n");
        let result = classify(vec![record("0xaaaa", "20")], Some(&config), &[]);
        // 0xaaaa carries the 1-8 override from `narrow`, which is checked first.
        assert_eq!(result.excluded[0].group, "narrow");
    }

    #[test]
    fn test_target_order_decides_the_match() {
        let config = config("[leaf]\n0xaaaa\n[spine]\n0xcccc\n[all:children]\nleaf\nspine\n");
        let records = vec![record("0xaaaa", "1"), record("0xcccc", "1")];

        let result = classify(records.clone(), Some(&config), &targets(&["all", "leaf"]));
        assert!(result.included.iter().all(|r| r.group == "all"));

        let result = classify(records, Some(&config), &targets(&["leaf", "all"]));
        assert_eq!(result.included[0].group, "leaf");
        assert_eq!(result.included[1].group, "all");
    }

    #[test]
    fn test_targets_restrict_candidates() {
        let config = config("[leaf]\n0xaaaa\n[spine]\n0xcccc\n");
        let result = classify(
            vec![record("0xaaaa", "1"), record("0xcccc", "1")],
            Some(&config),
            &targets(&["spine"]),
        );
        assert_eq!(result.included.len(), 1);
        assert_eq!(result.included[0].group, "spine");
        assert_eq!(result.excluded[0].group, UNKNOWN_GROUP);
    }

    #[test]
    fn test_unknown_targets_fail_open() {
        let config = config("[leaf:1-2]\n0xaaaa\n");
        let records = vec![record("0xaaaa", "10"), record("0xdddd", "1")];
        let result = classify(records.clone(), Some(&config), &targets(&["ghost"]));
        assert_eq!(result.included, records);
        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let config = config("[leaf:33-64]\n0xaaaa\n[spine]\n0xcccc\n");
        let records = vec![
            record("0xaaaa", "40"),
            record("0xaaaa", "1"),
            record("0xcccc", "5"),
            record("0xdddd", "5"),
            record("0xcccc", "p1"),
        ];
        let result = classify(records.clone(), Some(&config), &[]);
        assert_eq!(result.included.len() + result.excluded.len(), records.len());
        for r in &result.included {
            assert!(!result.excluded.contains(r));
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let config = config("[leaf:33-64]\n0xaaaa\n[spine]\n0xcccc\n[all:children]\nleaf\nspine\n");
        let records = vec![record("0xaaaa", "40"), record("0xaaaa", "1"), record("0xcccc", "5")];
        let first = classify(records.clone(), Some(&config), &[]);
        let second = classify(records, Some(&config), &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_groups_removes_duplicates() {
        let config = config("[leaf]\n0xaaaa\n[spine]\n0xcccc\n");
        let groups = candidate_groups(&config, &targets(&["spine", "leaf", "spine"])).unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["spine", "leaf"]);
    }
}
