pub mod cables;
pub mod links;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use ibpdc_core::report::naming::DEFAULT_PREFIX;
use ibpdc_core::system::{DEFAULT_CA, DEFAULT_DATA_DIR, DEFAULT_INTERFACE};

#[derive(Parser)]
#[command(name = "ibpdc", version)]
#[command(about = "Checks InfiniBand switch ports for down links and audits cable inventories.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output, repeat for less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Hide the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Verbose logging and raw tool output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find down switch ports in an iblinkinfo dump
    #[command(alias = "l")]
    Links(LinksArgs),
    /// Audit transceivers and cables from an ibdiagnet database
    #[command(alias = "c")]
    Cables(CablesArgs),
}

#[derive(Args)]
pub struct LinksArgs {
    /// Channel adapter passed to iblinkinfo
    #[arg(short = 'C', long, conflicts_with = "file")]
    pub ca: Option<String>,

    /// Prefix of the generated CSV files
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    pub output: String,

    /// Hosts configuration with groups and port ranges
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only check these groups
    #[arg(short, long, num_args = 1.., value_delimiter = ' ')]
    pub groups: Vec<String>,

    /// Read a saved iblinkinfo dump instead of running the tool
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Do not write the down links file
    #[arg(long)]
    pub no_down_report: bool,

    /// Write the links outside the configured ranges to a separate file
    #[arg(long)]
    pub show_excluded: bool,
}

impl LinksArgs {
    pub fn ca(&self) -> &str {
        self.ca.as_deref().unwrap_or(DEFAULT_CA)
    }
}

#[derive(Args)]
pub struct CablesArgs {
    /// Interface passed to ibdiagnet and smpquery
    #[arg(short, long, default_value = DEFAULT_INTERFACE)]
    pub interface: String,

    /// Analyze an existing ibdiagnet2.db_csv file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Reuse the database of the last scan
    #[arg(short, long)]
    pub skip_scan: bool,

    /// Directory ibdiagnet writes into
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory for the generated reports
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Add node descriptions queried with smpquery
    #[arg(long)]
    pub enable_host_info: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
