//! # Checks
//!
//! The two use cases of the tool, each wired from a raw input to its reports:
//!
//! * [`LinkCheckService`]: parse a link dump, classify it against the host groups
//!   and summarize up/down links.
//! * [`analyze_cables`]: cable inventory, part number distribution and serial number
//!   consistency of an `ibdiagnet` database.

pub mod cables;
pub mod links;

pub use cables::{CableOutputPaths, CableReport, analyze_cables};
pub use links::{LinkCheckService, LinkReport};
