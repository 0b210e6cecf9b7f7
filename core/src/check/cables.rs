use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use ibpdc_common::warn;

use crate::cable::inventory::{write_distribution, write_inventory};
use crate::cable::phy::write_phy;
use crate::cable::serials::write_report;
use crate::cable::{
    CABLE_INFO_BLOCK, CableError, CableInventory, PHY_BLOCK, PhyRecord, PnDistribution, SerialAnalysis,
    extract_phy, find_block,
};
use crate::nodes::HostLookup;
use crate::report::naming::TIMESTAMP_FORMAT;

#[derive(Debug, Clone, PartialEq)]
pub struct CableReport {
    pub inventory: CableInventory,
    pub analysis: SerialAnalysis,
    pub distribution: PnDistribution,
    /// `None` when the database has no usable `PHY_DB12` block.
    pub phy: Option<Vec<PhyRecord>>,
}

/// Analyzes the text of an `ibdiagnet2.db_csv` file.
///
/// A missing or empty `CABLE_INFO` block is an error, a missing `PHY_DB12`
/// block only a warning.
pub fn analyze_cables(text: &str) -> anyhow::Result<CableReport> {
    let block = find_block(text, CABLE_INFO_BLOCK)?;
    let inventory = CableInventory::from_block(&block);
    let analysis = SerialAnalysis::analyze(&inventory.records)?;
    let distribution = inventory.pn_distribution();

    let phy = match find_block(text, PHY_BLOCK) {
        Ok(block) => Some(extract_phy(&block)),
        Err(err @ (CableError::MissingBlock(_) | CableError::EmptyBlock(_))) => {
            warn!("Skipping PHY data: {err}");
            None
        }
        Err(err) => return Err(err.into()),
    };

    Ok(CableReport {
        inventory,
        analysis,
        distribution,
        phy,
    })
}

/// Timestamped file names of one cable run, all inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CableOutputPaths {
    pub inventory: PathBuf,
    pub problems: PathBuf,
    pub stats: PathBuf,
    pub serial_report: PathBuf,
    pub phy: PathBuf,
}

impl CableOutputPaths {
    pub fn new(dir: &Path, timestamp: &NaiveDateTime) -> Self {
        let stamp = timestamp.format(TIMESTAMP_FORMAT);
        Self {
            inventory: dir.join(format!("cable_info-{stamp}.csv")),
            problems: dir.join(format!("cable_problems-{stamp}.csv")),
            stats: dir.join(format!("cable_stats-{stamp}.csv")),
            serial_report: dir.join(format!("sn_report-{stamp}.txt")),
            phy: dir.join(format!("phy_output-{stamp}.csv")),
        }
    }
}

impl CableReport {
    /// Writes every report and returns the written paths. The problem CSV is only
    /// written when problems exist, the PHY CSV only when PHY data was found.
    pub fn write_outputs(
        &self,
        paths: &CableOutputPaths,
        generated_at: &NaiveDateTime,
        mut hosts: Option<&mut (dyn HostLookup + '_)>,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let Some(phy) = &self.phy {
            write_phy(&paths.phy, phy, hosts.as_deref_mut())?;
            written.push(paths.phy.clone());
        }

        write_inventory(&paths.inventory, &self.inventory.records, hosts.as_deref_mut())?;
        written.push(paths.inventory.clone());

        let problems: Vec<_> = self
            .analysis
            .problem_records(&self.inventory.records)
            .into_iter()
            .cloned()
            .collect();
        if !problems.is_empty() {
            write_inventory(&paths.problems, &problems, hosts.as_deref_mut())?;
            written.push(paths.problems.clone());
        }

        write_distribution(&paths.stats, &self.distribution)?;
        written.push(paths.stats.clone());

        write_report(&paths.serial_report, &self.analysis.render_report(generated_at))?;
        written.push(paths.serial_report.clone());

        Ok(written)
    }
}
