//! # Link Reports
//!
//! CSV serialization of classified link records, console statistics and the
//! naming scheme of the generated files.

pub mod csv;
pub mod naming;
pub mod stats;

pub use self::csv::{LINK_HEADER, write_links, write_links_to};
pub use naming::{OutputPaths, source_label};
pub use stats::{DevicePorts, GroupSummary, LinkStatistics, RangeAnnotation};
