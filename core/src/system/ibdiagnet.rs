use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use tracing::debug;

use super::{check_output, require_tool};

pub const DEFAULT_INTERFACE: &str = "mlx5_0";
pub const DEFAULT_DATA_DIR: &str = "/var/tmp/ibdiagnet2";
pub const DATA_FILE: &str = "ibdiagnet2.db_csv";

/// Fabric scan collecting cable and PHY information into `ibdiagnet2.db_csv`.
#[derive(Debug, Clone)]
pub struct IbDiagnet {
    pub interface: String,
    pub data_dir: PathBuf,
    /// Let the tool write to the terminal instead of discarding its output.
    pub verbose: bool,
}

impl IbDiagnet {
    pub fn new(interface: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            interface: interface.into(),
            data_dir: data_dir.into(),
            verbose: false,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE)
    }

    pub fn scan_args(&self) -> Vec<String> {
        let data_dir = self.data_dir.to_string_lossy();
        let args: [&str; 11] = [
            "-i",
            &self.interface,
            "-o",
            &data_dir,
            "--sc",
            "--extended_speeds",
            "all",
            "--get_cable_info",
            "--cable_info_disconnected",
            "--get_phy_info",
            "--phy_cable_disconnected",
        ];
        args.iter().map(|arg| arg.to_string()).collect()
    }

    /// First line of `ibdiagnet --version`. Fails when the tool is not installed;
    /// a version query that fails on its own yields `None`.
    pub fn version(&self) -> anyhow::Result<Option<String>> {
        let tool = require_tool("ibdiagnet")?;
        let version = Command::new(&tool)
            .arg("--version")
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string)
            });
        Ok(version)
    }

    /// Runs the scan and returns the size in bytes of the produced data file.
    pub fn scan(&self) -> anyhow::Result<u64> {
        let tool = require_tool("ibdiagnet")?;
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("cannot create {}", self.data_dir.display()))?;

        let args = self.scan_args();
        debug!("Running {} {}", tool.display(), args.join(" "));

        let mut command = Command::new(&tool);
        command.args(&args);
        if !self.verbose {
            command.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        let output = command
            .output()
            .with_context(|| format!("failed to run {}", tool.display()))?;
        check_output("ibdiagnet", output).context("ibdiagnet scan failed (use --debug to see the tool output)")?;

        data_file_size(&self.data_file())
    }
}

impl Default for IbDiagnet {
    fn default() -> Self {
        Self::new(DEFAULT_INTERFACE, DEFAULT_DATA_DIR)
    }
}

/// Size of an existing data file, or an error naming the missing path.
pub fn data_file_size(path: &Path) -> anyhow::Result<u64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("data file {} does not exist", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("data file {} is not a regular file", path.display());
    }
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_requests_cable_and_phy_data() {
        let scan = IbDiagnet::new("mlx5_1", "/tmp/scan");
        let args = scan.scan_args();
        assert_eq!(args[..4], ["-i", "mlx5_1", "-o", "/tmp/scan"]);
        for flag in ["--get_cable_info", "--cable_info_disconnected", "--get_phy_info", "--phy_cable_disconnected"] {
            assert!(args.iter().any(|arg| arg == flag), "missing {flag}");
        }
        assert_eq!(scan.data_file(), PathBuf::from("/tmp/scan/ibdiagnet2.db_csv"));
    }

    #[test]
    fn defaults_match_ibdiagnet() {
        let scan = IbDiagnet::default();
        assert_eq!(scan.interface, "mlx5_0");
        assert_eq!(scan.data_file(), PathBuf::from("/var/tmp/ibdiagnet2/ibdiagnet2.db_csv"));
        assert!(!scan.verbose);
    }

    #[test]
    fn data_file_size_checks_existence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATA_FILE);
        assert!(data_file_size(&path).is_err());
        std::fs::write(&path, "START_CABLE_INFO\n").unwrap();
        assert_eq!(data_file_size(&path).unwrap(), 17);
        assert!(data_file_size(dir.path()).is_err());
    }
}
