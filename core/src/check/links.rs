use std::path::PathBuf;

use ibpdc_common::dump::DumpSource;
use ibpdc_common::fabric::LinkRecord;
use ibpdc_common::hosts::HostsConfig;
use tracing::debug;

use crate::classify::{Classification, classify};
use crate::linkinfo;
use crate::report::{LinkStatistics, OutputPaths, write_links};

/// Link status check of one dump.
///
/// Reads the dump through a [`DumpSource`], so the same check runs against a live
/// `iblinkinfo` call or a captured file.
pub struct LinkCheckService {
    source: Box<dyn DumpSource>,
    config: Option<HostsConfig>,
    targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkReport {
    /// Records recognized in the dump, before classification.
    pub parsed: usize,
    pub included: Vec<LinkRecord>,
    pub excluded: Vec<LinkRecord>,
    /// Computed over the included records.
    pub statistics: LinkStatistics,
}

impl LinkCheckService {
    pub fn new(source: Box<dyn DumpSource>, config: Option<HostsConfig>, targets: Vec<String>) -> Self {
        Self {
            source,
            config,
            targets,
        }
    }

    pub fn source_label(&self) -> String {
        self.source.label()
    }

    pub fn config(&self) -> Option<&HostsConfig> {
        self.config.as_ref()
    }

    pub fn perform_check(&self) -> anyhow::Result<LinkReport> {
        let text = self.source.read()?;
        Ok(self.check_text(&text))
    }

    /// Runs the check on dump text that was already read.
    pub fn check_text(&self, text: &str) -> LinkReport {
        let records = linkinfo::parse_dump(text);
        let parsed = records.len();
        debug!("Parsed {parsed} link records from {}", self.source.label());

        let Classification { included, excluded } = classify(records, self.config.as_ref(), &self.targets);
        let statistics = LinkStatistics::compute(&included, self.config.as_ref(), &self.targets);

        LinkReport {
            parsed,
            included,
            excluded,
            statistics,
        }
    }
}

impl LinkReport {
    pub fn down_links(&self) -> Vec<LinkRecord> {
        self.included
            .iter()
            .filter(|record| record.is_down())
            .cloned()
            .collect()
    }

    /// Writes the primary CSV and, when enabled and not empty, the down and
    /// excluded reports. Returns the written paths.
    pub fn write_outputs(
        &self,
        paths: &OutputPaths,
        down_report: bool,
        excluded_report: bool,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        write_links(&paths.primary, &self.included)?;
        written.push(paths.primary.clone());

        let down = self.down_links();
        if down_report && !down.is_empty() {
            write_links(&paths.down, &down)?;
            written.push(paths.down.clone());
        }

        if excluded_report && !self.excluded.is_empty() {
            write_links(&paths.excluded, &self.excluded)?;
            written.push(paths.excluded.clone());
        }

        Ok(written)
    }
}
