//! # System Adapters
//!
//! Everything that talks to the InfiniBand diagnostic tools installed on the host:
//! `iblinkinfo` for link dumps, `ibdiagnet` for the cable database and `smpquery`
//! for node descriptions. Captured dumps are read through [`DumpFile`].

pub mod dump_file;
pub mod ibdiagnet;
pub mod iblinkinfo;
pub mod smpquery;

pub use dump_file::DumpFile;
pub use ibdiagnet::{DATA_FILE, DEFAULT_DATA_DIR, DEFAULT_INTERFACE, IbDiagnet, data_file_size};
pub use iblinkinfo::{DEFAULT_CA, IbLinkInfo};
pub use smpquery::SmpQuery;

use std::path::PathBuf;
use std::process::Output;

use anyhow::Context;

/// Location of `tool` on `PATH`.
pub fn require_tool(tool: &str) -> anyhow::Result<PathBuf> {
    which::which(tool).with_context(|| {
        format!("{tool} was not found in PATH (install infiniband-diags or MLNX_OFED)")
    })
}

/// Fails with the tool's stderr when it exited unsuccessfully.
fn check_output(tool: &str, output: Output) -> anyhow::Result<Output> {
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("{tool} exited with {}", output.status);
    }
    anyhow::bail!("{tool} exited with {}: {stderr}", output.status)
}
