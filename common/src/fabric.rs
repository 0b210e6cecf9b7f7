//! # Fabric Model
//!
//! Value types describing what the diagnostic tools observe on an InfiniBand fabric.

pub mod guid;
pub mod link;
pub mod port_range;

pub use guid::{Guid, GuidError};
pub use link::{LinkRecord, LinkStatus, NOT_AVAILABLE, UNKNOWN_GROUP};
pub use port_range::{ParseRangeError, PortRange};
