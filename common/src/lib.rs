//! # ibpdc common
//!
//! Domain types shared by every crate of the workspace:
//!
//! * **[`fabric`]**: GUIDs, port ranges and parsed link records.
//! * **[`hosts`]**: the group/port-range configuration model and its loader.
//! * **[`dump`]** and **[`nodes`]**: the boundaries towards external diagnostic tools.
//! * **[`logging`]**: the `info!`/`success!`/`warn!`/`error!` macros used across the workspace.

pub mod config;
pub mod dump;
pub mod fabric;
pub mod hosts;
pub mod logging;
pub mod nodes;

#[doc(hidden)]
pub use tracing as __tracing;
