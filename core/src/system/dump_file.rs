use std::path::{Path, PathBuf};

use anyhow::Context;
use ibpdc_common::dump::DumpSource;

/// A previously captured dump on disk.
#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
}

impl DumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DumpSource for DumpFile {
    fn label(&self) -> String {
        crate::report::naming::source_label(&self.path)
    }

    fn read(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read input file {}", self.path.display()))
    }
}
