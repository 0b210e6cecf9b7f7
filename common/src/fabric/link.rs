//! # Link Record Model
//!
//! One switch port as reported by `iblinkinfo`, plus the group it was classified into.

use std::fmt;

use crate::fabric::Guid;

/// Placeholder for fields the dump does not provide (down ports, partial lines).
pub const NOT_AVAILABLE: &str = "N/A";

/// Group label of records that matched no configured group.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    /// Logical state `LinkUp` with physical state `Active`.
    Up,
    /// Physically down, or stuck polling/training.
    Down,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Up => "LinkUp",
            LinkStatus::Down => "Down",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed link observation.
///
/// Numeric columns are kept as text: the classifier decides what to do with
/// a port that does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub source_guid: Guid,
    pub source_name: String,
    pub source_lid: String,
    pub source_port: String,
    pub connection_type: String,
    pub speed: String,
    pub status: LinkStatus,
    pub target_guid: String,
    pub target_lid: String,
    pub target_port: String,
    pub target_name: String,
    pub comment: String,
    pub group: String,
}

impl LinkRecord {
    /// A record for a port that is down: everything past the source is unknown.
    pub fn down(source_guid: Guid, source_name: &str, source_lid: &str, source_port: &str) -> Self {
        Self {
            source_guid,
            source_name: source_name.to_string(),
            source_lid: source_lid.to_string(),
            source_port: source_port.to_string(),
            connection_type: NOT_AVAILABLE.to_string(),
            speed: NOT_AVAILABLE.to_string(),
            status: LinkStatus::Down,
            target_guid: NOT_AVAILABLE.to_string(),
            target_lid: NOT_AVAILABLE.to_string(),
            target_port: NOT_AVAILABLE.to_string(),
            target_name: NOT_AVAILABLE.to_string(),
            comment: NOT_AVAILABLE.to_string(),
            group: UNKNOWN_GROUP.to_string(),
        }
    }

    /// An active record whose optional columns still have to be filled in.
    pub fn up(source_guid: Guid, source_name: &str, source_lid: &str, source_port: &str) -> Self {
        Self {
            status: LinkStatus::Up,
            ..Self::down(source_guid, source_name, source_lid, source_port)
        }
    }

    pub fn port_number(&self) -> Option<u32> {
        self.source_port.trim().parse().ok()
    }

    pub fn is_down(&self) -> bool {
        self.status == LinkStatus::Down
    }

    /// Column values in the order of the link CSV header.
    pub fn to_row(&self) -> [&str; 13] {
        [
            self.source_guid.as_str(),
            &self.source_name,
            &self.source_lid,
            &self.source_port,
            &self.connection_type,
            &self.speed,
            self.status.as_str(),
            &self.target_guid,
            &self.target_lid,
            &self.target_port,
            &self.target_name,
            &self.comment,
            &self.group,
        ]
    }
}
