use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use ibpdc_common::warn;

use super::DataBlock;
use crate::nodes::HostLookup;

pub const REQUIRED_COLUMNS: [&str; 8] = ["NodeGuid", "PortGuid", "PortNum", "Source", "Vendor", "OUI", "PN", "SN"];
pub const HOST_INFO_COLUMN: &str = "HostInfo";
pub const STATS_HEADER: [&str; 3] = ["PN", "Count", "Percentage"];

/// A `CABLE_INFO` row reduced to [`REQUIRED_COLUMNS`]. Absent columns are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CableRecord {
    pub node_guid: String,
    pub port_guid: String,
    pub port_num: String,
    pub source: String,
    pub vendor: String,
    pub oui: String,
    pub pn: String,
    pub sn: String,
}

impl CableRecord {
    fn from_row(row: &[String], indices: &[Option<usize>; 8]) -> Self {
        let field = |column: usize| {
            indices[column]
                .and_then(|index| row.get(index))
                .cloned()
                .unwrap_or_default()
        };

        CableRecord {
            node_guid: field(0),
            port_guid: field(1),
            port_num: field(2),
            source: field(3),
            vendor: field(4),
            oui: field(5),
            pn: field(6),
            sn: field(7),
        }
    }

    pub fn to_row(&self) -> [&str; 8] {
        [
            &self.node_guid,
            &self.port_guid,
            &self.port_num,
            &self.source,
            &self.vendor,
            &self.oui,
            &self.pn,
            &self.sn,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CableInventory {
    pub records: Vec<CableRecord>,
    /// Required columns the block header did not contain.
    pub missing_columns: Vec<String>,
}

impl CableInventory {
    pub fn from_block(block: &DataBlock) -> Self {
        let indices = REQUIRED_COLUMNS.map(|column| block.column(column));
        let missing_columns: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(indices.iter())
            .filter(|(_, index)| index.is_none())
            .map(|(column, _)| column.to_string())
            .collect();

        if !missing_columns.is_empty() {
            warn!("Columns not found in {}: {}", block.name, missing_columns.join(", "));
            warn!("Available columns: {}", block.header.join(", "));
        }

        let records = block
            .rows
            .iter()
            .map(|row| CableRecord::from_row(row, &indices))
            .collect();

        CableInventory { records, missing_columns }
    }

    /// First record of every serial number. Records without one are all kept.
    pub fn deduplicated(&self) -> Vec<&CableRecord> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| record.sn.is_empty() || seen.insert(record.sn.as_str()))
            .collect()
    }

    pub fn pn_distribution(&self) -> PnDistribution {
        PnDistribution::compute(&self.deduplicated())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PnShare {
    pub pn: String,
    pub count: usize,
    pub percentage: f64,
}

/// Part number counts over the serial-deduplicated records, sorted by part number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PnDistribution {
    pub shares: Vec<PnShare>,
    pub total: usize,
}

impl PnDistribution {
    pub fn compute(records: &[&CableRecord]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records.iter().filter(|record| !record.pn.is_empty()) {
            *counts.entry(record.pn.as_str()).or_default() += 1;
        }

        let total = records.len();
        let shares = counts
            .into_iter()
            .map(|(pn, count)| PnShare {
                pn: pn.to_string(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
            .collect();

        PnDistribution { shares, total }
    }

    /// Rows of the statistics file, closed by a `TOTAL` row or a single
    /// `NO_DATA` row.
    pub fn rows(&self) -> Vec<[String; 3]> {
        if self.total == 0 {
            return vec![["NO_DATA".to_string(), "0".to_string(), "0.00%".to_string()]];
        }

        let mut rows: Vec<[String; 3]> = self
            .shares
            .iter()
            .map(|share| [share.pn.clone(), share.count.to_string(), format!("{:.2}%", share.percentage)])
            .collect();
        rows.push(["TOTAL".to_string(), self.total.to_string(), "100.00%".to_string()]);
        rows
    }
}

pub fn write_inventory(
    path: &Path,
    records: &[CableRecord],
    hosts: Option<&mut (dyn HostLookup + '_)>,
) -> anyhow::Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_inventory_to(file, records, hosts).with_context(|| format!("writing {}", path.display()))
}

/// Writes the required columns, plus `HostInfo` when `hosts` is given.
pub fn write_inventory_to<W: Write>(
    writer: W,
    records: &[CableRecord],
    mut hosts: Option<&mut (dyn HostLookup + '_)>,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    if hosts.is_some() {
        header.push(HOST_INFO_COLUMN);
    }
    wtr.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = record.to_row().iter().map(|field| field.to_string()).collect();
        if let Some(hosts) = hosts.as_deref_mut() {
            row.push(hosts.host_info(&record.node_guid));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_distribution(path: &Path, distribution: &PnDistribution) -> anyhow::Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_distribution_to(file, distribution).with_context(|| format!("writing {}", path.display()))
}

pub fn write_distribution_to<W: Write>(writer: W, distribution: &PnDistribution) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(STATS_HEADER)?;
    for row in distribution.rows() {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
