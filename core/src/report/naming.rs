use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

pub const DEFAULT_PREFIX: &str = "ib_linkinfo";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File names of one link report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub primary: PathBuf,
    pub down: PathBuf,
    pub excluded: PathBuf,
}

impl OutputPaths {
    /// Builds `<prefix>_<source>_<timestamp>[_<groups>]` and its `.csv`,
    /// `_down.csv` and `_excluded.csv` variants. `source` is the input file
    /// stem or the CA name.
    pub fn new(prefix: &str, source: Option<&str>, timestamp: &NaiveDateTime, groups: &[String]) -> Self {
        let prefix = if prefix.trim().is_empty() { DEFAULT_PREFIX } else { prefix };
        let stamp = timestamp.format(TIMESTAMP_FORMAT);

        let mut base = match source.filter(|source| !source.is_empty()) {
            Some(source) => format!("{prefix}_{source}_{stamp}"),
            None => format!("{prefix}_{stamp}"),
        };

        let groups: Vec<&str> = groups
            .iter()
            .flat_map(|group| group.split_whitespace())
            .collect();
        if !groups.is_empty() {
            base.push('_');
            base.push_str(&groups.join("_"));
        }

        OutputPaths {
            primary: PathBuf::from(format!("{base}.csv")),
            down: PathBuf::from(format!("{base}_down.csv")),
            excluded: PathBuf::from(format!("{base}_excluded.csv")),
        }
    }
}

/// File name of `path` without its extension, as used in report names.
pub fn source_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
