//! # iblinkinfo Parser
//!
//! Best-effort extraction of link records from `iblinkinfo -l` output. The tool prints
//! a human oriented table, so every field past the source port is optional and a line
//! that does not look like a switch port is simply skipped.
//!
//! Typical lines:
//!
//! ```text
//! 0xe41d2d0300a1b2c3 "leaf01"   12   17[  ] ==> ( 4X 53.125 Gbps Active/  LinkUp)==>  0x0c42a10300dd0011   45    1[  ] "node017 HCA-1" ( )
//! 0xe41d2d0300a1b2c3 "leaf01"   12   18[  ] ==> (             Down/ Polling)==>             [  ] "" ( )
//! ```

use std::sync::LazyLock;

use ibpdc_common::fabric::{Guid, LinkRecord};
use regex::Regex;

/// Banner printed for SHARP aggregation nodes, which are not switch ports.
const AGGREGATION_NODE_MARKER: &str = "Mellanox Technologies Aggregation Node";

static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(0[xX][0-9a-fA-F]+)\s+"([^"]+)"\s+(\d+)\s+(\d+)"#).expect("valid source pattern")
});

static SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((\d+X)\s+[\d.]+\s*Gbps)").expect("valid speed pattern"));

static TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"==>\s*(0[xX][0-9a-fA-F]+)\s+(\d+)\s+(\d+)\[\s*\]\s*"([^"]*)""#)
        .expect("valid target pattern")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*([^)]*)\s*\)\s*$").expect("valid comment pattern"));

/// Parses every line of a dump, dropping the ones that do not describe a port.
pub fn parse_dump(text: &str) -> Vec<LinkRecord> {
    text.lines().filter_map(parse_line).collect()
}

/// Parses a single line of `iblinkinfo` output.
pub fn parse_line(line: &str) -> Option<LinkRecord> {
    if line.trim().is_empty() || line.contains(AGGREGATION_NODE_MARKER) {
        return None;
    }

    let caps = SOURCE_RE.captures(line)?;
    let guid: Guid = caps.get(1)?.as_str().parse().ok()?;
    let name = caps.get(2)?.as_str().trim();
    let lid = caps.get(3)?.as_str();
    let port = caps.get(4)?.as_str();

    if line.contains("Down") || line.contains("Polling") {
        return Some(LinkRecord::down(guid, name, lid, port));
    }

    if !(line.contains("LinkUp") && line.contains("Active")) {
        return None;
    }

    let mut record = LinkRecord::up(guid, name, lid, port);

    if let Some(speed) = SPEED_RE.captures(line) {
        record.speed = speed[1].trim().to_string();
        record.connection_type = speed[2].to_string();
    }

    if let Some(target) = TARGET_RE.captures(line) {
        record.target_guid = Guid::canonical(&target[1]);
        record.target_lid = target[2].to_string();
        record.target_port = target[3].to_string();
        record.target_name = target[4].trim().to_string();
    }

    if let Some(comment) = COMMENT_RE.captures(line) {
        record.comment = comment[1].trim().to_string();
    }

    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibpdc_common::fabric::{LinkStatus, NOT_AVAILABLE, UNKNOWN_GROUP};

    const UP_LINE: &str = r#"0xE41D2D0300A1B2C3 "leaf01"   12   17[  ] ==> ( 4X 53.125 Gbps Active/  LinkUp)==>  0x0C42A10300DD0011   45    1[  ] "node017 HCA-1" ( Could be 106.25 Gbps )"#;
    const DOWN_LINE: &str = r#"0xe41d2d0300a1b2c3 "leaf01"   12   18[  ] ==> (              Down/ Polling)==>             [  ] "" ( )"#;

    #[test]
    fn parses_active_link() {
        let record = parse_line(UP_LINE).unwrap();
        assert_eq!(record.source_guid.as_str(), "0xe41d2d0300a1b2c3");
        assert_eq!(record.source_name, "leaf01");
        assert_eq!(record.source_lid, "12");
        assert_eq!(record.source_port, "17");
        assert_eq!(record.status, LinkStatus::Up);
        assert_eq!(record.speed, "4X 53.125 Gbps");
        assert_eq!(record.connection_type, "4X");
        assert_eq!(record.target_guid, "0x0c42a10300dd0011");
        assert_eq!(record.target_lid, "45");
        assert_eq!(record.target_port, "1");
        assert_eq!(record.target_name, "node017 HCA-1");
        assert_eq!(record.comment, "Could be 106.25 Gbps");
        assert_eq!(record.group, UNKNOWN_GROUP);
    }

    #[test]
    fn parses_down_link() {
        let record = parse_line(DOWN_LINE).unwrap();
        assert_eq!(record.status, LinkStatus::Down);
        assert_eq!(record.source_port, "18");
        assert_eq!(record.connection_type, NOT_AVAILABLE);
        assert_eq!(record.target_guid, NOT_AVAILABLE);
        assert_eq!(record.target_lid, NOT_AVAILABLE);
        assert_eq!(record.target_port, NOT_AVAILABLE);
        assert_eq!(record.target_name, NOT_AVAILABLE);
        assert_eq!(record.comment, NOT_AVAILABLE);
        assert_eq!(record.speed, NOT_AVAILABLE);
    }

    #[test]
    fn polling_alone_is_down() {
        let line = r#"0xaaaa "leaf01" 3 9[  ] ==> ( 4X 2.5 Gbps Polling/ Sleep)"#;
        assert_eq!(parse_line(line).unwrap().status, LinkStatus::Down);
    }

    #[test]
    fn up_line_without_extras_keeps_placeholders() {
        let line = r#"0xaaaa "leaf01" 3 9[  ] ==> Active LinkUp"#;
        let record = parse_line(line).unwrap();
        assert_eq!(record.status, LinkStatus::Up);
        assert_eq!(record.speed, NOT_AVAILABLE);
        assert_eq!(record.connection_type, NOT_AVAILABLE);
        assert_eq!(record.target_guid, NOT_AVAILABLE);
        assert_eq!(record.comment, NOT_AVAILABLE);
    }

    #[test]
    fn empty_comment_is_kept_empty() {
        let line = r#"0xaaaa "leaf01" 3 9[  ] ==> ( 4X 53.125 Gbps Active/  LinkUp)==>  0xbbbb 4 1[  ] "node" ( )"#;
        let record = parse_line(line).unwrap();
        assert_eq!(record.target_name, "node");
        assert_eq!(record.comment, "");
    }

    #[test]
    fn line_without_state_is_skipped() {
        let line = r#"0xaaaa "leaf01" 3 9[  ] ==> ( 4X 53.125 Gbps Init/ LinkUp)"#;
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn aggregation_node_banner_is_skipped() {
        let line = r#"0xaaaa "Mellanox Technologies Aggregation Node" 3 1[  ] ==> ( 4X 53.125 Gbps Active/  LinkUp)"#;
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn headers_and_blank_lines_are_skipped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("Switch: 0xe41d2d0300a1b2c3 leaf01:").is_none());
    }

    #[test]
    fn parse_dump_keeps_only_ports() {
        let dump = format!("Switch: 0xe41d2d0300a1b2c3 leaf01:\n{UP_LINE}\n\n{DOWN_LINE}\n");
        let records = parse_dump(&dump);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, LinkStatus::Up);
        assert_eq!(records[1].status, LinkStatus::Down);
    }
}
