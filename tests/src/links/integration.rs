use std::path::Path;

use chrono::NaiveDate;
use ibpdc_common::fabric::{PortRange, UNKNOWN_GROUP};
use ibpdc_common::hosts::HostsConfig;
use ibpdc_core::check::{LinkCheckService, LinkReport};
use ibpdc_core::report::{OutputPaths, RangeAnnotation};
use ibpdc_core::system::DumpFile;

use crate::fixtures::{fixture, read_csv};

fn check(targets: &[&str]) -> LinkReport {
    let config = HostsConfig::load(&fixture("hosts.conf")).expect("fixture config");
    let source = DumpFile::new(fixture("iblinkinfo_leaf.txt"));
    let targets = targets.iter().map(|target| target.to_string()).collect();
    let service = LinkCheckService::new(Box::new(source), Some(config), targets);
    service.perform_check().expect("fixture dump")
}

fn paths_in(dir: &Path, groups: &[String]) -> OutputPaths {
    let at = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 9).unwrap();
    let names = OutputPaths::new("ib_linkinfo", Some("iblinkinfo_leaf"), &at, groups);
    OutputPaths {
        primary: dir.join(names.primary),
        down: dir.join(names.down),
        excluded: dir.join(names.excluded),
    }
}

#[test]
fn leaf_ports_outside_the_range_are_excluded() {
    let report = check(&[]);

    assert_eq!(report.parsed, 8);
    assert_eq!(report.included.len(), 5);
    assert_eq!(report.excluded.len(), 3);

    let excluded: Vec<(&str, &str)> = report
        .excluded
        .iter()
        .map(|record| (record.source_port.as_str(), record.group.as_str()))
        .collect();
    assert_eq!(excluded, vec![("40", "leaf"), ("41", "leaf"), ("1", UNKNOWN_GROUP)]);

    let stats = &report.statistics;
    assert_eq!((stats.total, stats.up, stats.down), (5, 2, 3));
    let names: Vec<&str> = stats.groups.iter().map(|group| group.name.as_str()).collect();
    assert_eq!(names, vec!["leaf", "spine", "fabric"]);

    let leaf = &stats.groups[0];
    assert_eq!(leaf.range, Some(RangeAnnotation::Single(PortRange::new(1, 32))));
    assert_eq!(leaf.down_ports.len(), 1);
    assert_eq!(leaf.down_ports[0].ports, vec!["2", "3"]);
    assert_eq!(stats.groups[2].total, 0);
}

#[test]
fn device_override_applies_inside_children_group() {
    let report = check(&["fabric"]);

    assert_eq!(report.included.len(), 5);
    assert!(report.included.iter().all(|record| record.group == "fabric"));

    let excluded: Vec<(&str, &str)> = report
        .excluded
        .iter()
        .map(|record| (record.source_port.as_str(), record.group.as_str()))
        .collect();
    assert_eq!(excluded, vec![("40", "fabric"), ("41", "fabric"), ("1", UNKNOWN_GROUP)]);

    assert_eq!(report.statistics.groups.len(), 1);
    assert_eq!(
        report.statistics.groups[0].range,
        Some(RangeAnnotation::Single(PortRange::new(1, 32)))
    );
}

#[test]
fn target_groups_limit_the_check() {
    let report = check(&["spine"]);

    assert_eq!(report.included.len(), 2);
    assert!(report.included.iter().all(|record| record.group == "spine"));
    assert!(report.excluded.iter().all(|record| record.group == UNKNOWN_GROUP));
    assert_eq!(report.statistics.down, 1);
}

#[test]
fn writes_primary_down_and_excluded_reports() {
    let dir = tempfile::tempdir().unwrap();
    let groups = vec!["leaf spine".to_string()];
    let report = check(&["leaf", "spine"]);
    let paths = paths_in(dir.path(), &groups);

    let written = report.write_outputs(&paths, true, true).unwrap();
    assert_eq!(written, vec![paths.primary.clone(), paths.down.clone(), paths.excluded.clone()]);
    assert!(paths
        .primary
        .to_string_lossy()
        .ends_with("ib_linkinfo_iblinkinfo_leaf_20240506_070809_leaf_spine.csv"));

    let primary = read_csv(&paths.primary);
    assert_eq!(primary.len(), 5);

    let down = read_csv(&paths.down);
    assert_eq!(down.len(), 3);
    assert!(down.iter().all(|row| &row[6] == "Down"));

    let excluded = read_csv(&paths.excluded);
    assert_eq!(excluded.len(), 3);
}

#[test]
fn unknown_target_groups_are_reported() {
    let config = HostsConfig::load(&fixture("hosts.conf")).unwrap();
    let requested = vec!["leaf".to_string(), "storage".to_string()];
    assert_eq!(config.unknown_groups(&requested), vec!["storage"]);
}
