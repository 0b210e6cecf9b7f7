use crate::terminal::colors;
use colored::*;
use ibpdc_core::cable::DUAL_PORT_PATTERNS;
use ibpdc_core::report::{DevicePorts, RangeAnnotation};

/// Longest GUID shown in full in the problem table.
const GUID_WIDTH: usize = 18;
const GUID_TAIL: usize = 15;

/// Console rows of the part number table before it is cut down.
pub const PN_TABLE_LIMIT: usize = 20;

pub fn down_ports_to_detail(device: &DevicePorts) -> (String, ColoredString) {
    let key = if device.name.is_empty() {
        device.guid.to_string()
    } else {
        format!("{} ({})", device.name, device.guid)
    };
    let value = format!("ports {}", device.ports.join(", ")).color(colors::LINK_DOWN);
    (key, value)
}

pub fn range_annotation(range: &RangeAnnotation) -> ColoredString {
    format!("({range})").color(colors::RANGE)
}

pub fn dual_port_label() -> String {
    format!("Dual port ({})", DUAL_PORT_PATTERNS.join("/"))
}

pub fn percentage(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn link_counts(total: usize, up: usize, down: usize) -> ColoredString {
    let down_text = if down > 0 {
        format!("{down} down").color(colors::LINK_DOWN).bold()
    } else {
        format!("{down} down").color(colors::TEXT_DEFAULT)
    };
    format!(
        "{} total, {}, {}",
        total,
        format!("{up} up").color(colors::LINK_UP),
        down_text
    )
    .normal()
}

/// GUIDs wider than the table column keep their last digits.
pub fn short_guid(guid: &str) -> String {
    if guid.chars().count() <= GUID_WIDTH {
        return guid.to_string();
    }
    let tail: String = guid
        .chars()
        .rev()
        .take(GUID_TAIL)
        .collect::<Vec<char>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{tail}")
}

/// Rows shown for a table of `len` rows: everything up to the limit, otherwise
/// the head, a gap marker (`None`) and the closing row.
pub fn visible_rows(len: usize, limit: usize) -> Vec<Option<usize>> {
    if len <= limit || limit < 2 {
        return (0..len).map(Some).collect();
    }
    let mut rows: Vec<Option<usize>> = (0..limit - 1).map(Some).collect();
    rows.push(None);
    rows.push(Some(len - 1));
    rows
}

pub fn file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
