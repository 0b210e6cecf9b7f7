//! # Cable Inventory
//!
//! Analysis of the `ibdiagnet2.db_csv` database written by `ibdiagnet`. The file is
//! a concatenation of named CSV blocks, each enclosed in `START_<NAME>` and
//! `END_<NAME>` marker lines with the column names on the first row.
//!
//! Two blocks are used:
//!
//! * `CABLE_INFO`: one row per cable end, projected onto [`REQUIRED_COLUMNS`] and
//!   checked for serial numbers seen too often or too rarely.
//! * `PHY_DB12`: physical layer counters, from which part and serial numbers are taken.

pub mod block;
pub mod error;
pub mod inventory;
pub mod phy;
pub mod serials;

pub use block::{DataBlock, find_block};
pub use error::CableError;
pub use inventory::{CableInventory, CableRecord, PnDistribution, PnShare, REQUIRED_COLUMNS};
pub use phy::{PhyRecord, extract_phy};
pub use serials::{DUAL_PORT_PATTERNS, SerialAnalysis, SerialProblem, SerialReport, expected_count};

pub const CABLE_INFO_BLOCK: &str = "CABLE_INFO";
pub const PHY_BLOCK: &str = "PHY_DB12";
