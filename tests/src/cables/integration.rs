use chrono::NaiveDate;
use ibpdc_common::nodes::NodeDescriptionRepository;
use ibpdc_core::check::{CableOutputPaths, analyze_cables};
use ibpdc_core::nodes::{HostLookup, NodeDescriptionCache};

use crate::fixtures::{fixture, read_csv};

struct Inventory;

impl NodeDescriptionRepository for Inventory {
    fn describe(&self, guid: &str) -> Option<String> {
        (guid == "0xe41d2d0300a1b2c3").then(|| "leaf01 HCA-1".to_string())
    }
}

fn database() -> String {
    std::fs::read_to_string(fixture("ibdiagnet2.db_csv")).unwrap()
}

#[test]
fn serial_problems_follow_the_port_policy() {
    let report = analyze_cables(&database()).unwrap();
    let analysis = &report.analysis;

    assert_eq!(analysis.total_records, 7);
    assert_eq!(analysis.valid_records, 6);
    assert_eq!(analysis.unique_serials, 4);
    assert_eq!(analysis.dual_port_records, 3);
    assert_eq!(analysis.single_port_records, 4);

    assert_eq!(analysis.duplicates.len(), 1);
    assert_eq!(analysis.duplicates[0].sn, "MT2201FT0001");
    assert_eq!(analysis.incomplete.len(), 1);
    assert_eq!(analysis.incomplete[0].sn, "MT2301FT0200");
    assert_eq!(analysis.incomplete[0].expected, 2);
}

#[test]
fn distribution_uses_deduplicated_records() {
    let report = analyze_cables(&database()).unwrap();
    let rows = report.distribution.rows();

    assert_eq!(report.distribution.total, 5);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1], ["MMA4Z00-NS".to_string(), "2".to_string(), "40.00%".to_string()]);
    assert_eq!(rows[3][0], "TOTAL");
}

#[test]
fn phy_block_is_deduplicated_by_serial() {
    let report = analyze_cables(&database()).unwrap();
    let phy = report.phy.expect("PHY_DB12 block");

    assert_eq!(phy.len(), 2);
    assert_eq!(phy[0].part_number, "MMA4Z00-NS");
    assert_eq!(phy[1].serial_number, "MT2301FT0200");
}

#[test]
fn writes_every_report_with_host_info() {
    let dir = tempfile::tempdir().unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap().and_hms_opt(7, 8, 9).unwrap();
    let paths = CableOutputPaths::new(dir.path(), &at);
    let report = analyze_cables(&database()).unwrap();

    let mut cache = NodeDescriptionCache::new(Inventory);
    let written = report
        .write_outputs(&paths, &at, Some(&mut cache as &mut dyn HostLookup))
        .unwrap();
    assert_eq!(written.len(), 5);
    assert_eq!(cache.queried(), 2);
    assert_eq!(cache.resolved(), 1);

    let inventory = read_csv(&paths.inventory);
    assert_eq!(inventory.len(), 7);
    assert_eq!(&inventory[0][8], "leaf01 HCA-1");
    assert_eq!(&inventory[6][8], "");

    let problems = read_csv(&paths.problems);
    assert_eq!(problems.len(), 3);

    let text = std::fs::read_to_string(&paths.serial_report).unwrap();
    assert!(text.contains("Generated: 2024-05-06 07:08:09"));
    assert!(text.contains("MT2201FT0001"));
}
