use std::process::Command;
use std::sync::LazyLock;

use ibpdc_common::nodes::NodeDescriptionRepository;
use regex::Regex;
use tracing::debug;

use super::{check_output, require_tool};

static LID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"# Node info: Lid (\d+)").expect("valid lid pattern"));

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Node Description:\.*(.+)").expect("valid description pattern"));

/// Resolves node descriptions with two `smpquery` calls: `nodeinfo` by GUID to
/// learn the LID, then `nd` by LID.
#[derive(Debug, Clone)]
pub struct SmpQuery {
    pub interface: String,
}

impl SmpQuery {
    pub fn new(interface: impl Into<String>) -> Self {
        Self { interface: interface.into() }
    }

    /// Fails when `smpquery` is not installed.
    pub fn ensure_available() -> anyhow::Result<()> {
        require_tool("smpquery").map(|_| ())
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let output = Command::new("smpquery")
            .arg("-C")
            .arg(&self.interface)
            .args(args)
            .output()?;
        let output = check_output("smpquery", output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn lid(&self, guid: &str) -> Option<String> {
        let output = self
            .run(&["-G", "nodeinfo", guid])
            .inspect_err(|err| debug!("nodeinfo for {guid} via {} failed: {err:#}", self.interface))
            .ok()?;

        let lid = parse_lid(&output);
        if lid.is_none() {
            debug!("No LID in nodeinfo output for {guid}");
        }
        lid
    }
}

impl NodeDescriptionRepository for SmpQuery {
    fn describe(&self, guid: &str) -> Option<String> {
        let lid = self.lid(guid)?;
        debug!("{guid} has LID {lid}");

        let output = self
            .run(&["nd", &lid])
            .inspect_err(|err| debug!("nd for LID {lid} via {} failed: {err:#}", self.interface))
            .ok()?;

        let description = parse_description(&output);
        if description.is_none() {
            debug!("No node description in nd output for LID {lid}");
        }
        description
    }
}

pub fn parse_lid(output: &str) -> Option<String> {
    LID_RE.captures(output).map(|caps| caps[1].to_string())
}

pub fn parse_description(output: &str) -> Option<String> {
    let caps = DESCRIPTION_RE.captures(output)?;
    let description = caps[1].trim();
    (!description.is_empty()).then(|| description.to_string())
}
