//! # Port Range Model
//!
//! Inclusive ranges of physical port numbers, written `A-B` or `N` (shorthand for `1-N`)
//! in group headers such as `[leaf:33-64]`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRangeError {
    #[error("'{0}' is not a port number")]
    NotANumber(String),
    #[error("port numbers start at 1")]
    Zero,
    #[error("range start {start} is greater than its end {end}")]
    Inverted { start: u32, end: u32 },
}

/// Represents a continuous range of ports, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRange {
    pub start: u32,
    pub end: u32,
}

impl PortRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, port: u32) -> bool {
        self.start <= port && port <= self.end
    }
}

impl FromStr for PortRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse_port(start)?, parse_port(end)?),
            None => (1, parse_port(s)?),
        };

        if start > end {
            return Err(ParseRangeError::Inverted { start, end });
        }

        Ok(PortRange::new(start, end))
    }
}

fn parse_port(s: &str) -> Result<u32, ParseRangeError> {
    let port: u32 = s
        .trim()
        .parse()
        .map_err(|_| ParseRangeError::NotANumber(s.trim().to_string()))?;

    if port == 0 {
        return Err(ParseRangeError::Zero);
    }
    Ok(port)
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
