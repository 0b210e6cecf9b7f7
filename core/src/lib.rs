//! # ibpdc core
//!
//! Parsing, classification and reporting for InfiniBand port and cable checks.
//! External tools are reached through [`system`]; nothing else in this crate
//! spawns processes.

pub mod cable;
pub mod check;
pub mod classify;
pub mod linkinfo;
pub mod nodes;
pub mod report;
pub mod system;
