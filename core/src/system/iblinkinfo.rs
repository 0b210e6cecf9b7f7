use std::process::Command;

use anyhow::Context;
use ibpdc_common::dump::DumpSource;
use tracing::debug;

use super::{check_output, require_tool};

pub const DEFAULT_CA: &str = "mlx5_0";

/// Live link dump of every switch reachable through `ca`.
#[derive(Debug, Clone)]
pub struct IbLinkInfo {
    pub ca: String,
}

impl IbLinkInfo {
    pub fn new(ca: impl Into<String>) -> Self {
        Self { ca: ca.into() }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-C".to_string(),
            self.ca.clone(),
            "-l".to_string(),
            "--switches-only".to_string(),
        ]
    }
}

impl Default for IbLinkInfo {
    fn default() -> Self {
        Self::new(DEFAULT_CA)
    }
}

impl DumpSource for IbLinkInfo {
    fn label(&self) -> String {
        self.ca.clone()
    }

    fn read(&self) -> anyhow::Result<String> {
        let tool = require_tool("iblinkinfo")?;
        debug!("Running {} {}", tool.display(), self.args().join(" "));

        let output = Command::new(&tool)
            .args(self.args())
            .output()
            .with_context(|| format!("failed to run {}", tool.display()))?;
        let output = check_output("iblinkinfo", output)?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_switch_only_invocation() {
        let source = IbLinkInfo::new("mlx5_2");
        assert_eq!(source.args(), vec!["-C", "mlx5_2", "-l", "--switches-only"]);
        assert_eq!(source.label(), "mlx5_2");
        assert_eq!(IbLinkInfo::default().ca, DEFAULT_CA);
    }
}
